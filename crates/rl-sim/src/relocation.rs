//! Group-move transactions.
//!
//! Moving a selection of structures happens in two steps.  [`lift`] records a
//! [`StructureSnapshot`] per structure, pauses its production and releases
//! its supply routes.  The caller then either [`commit`]s new footprints or
//! [`cancel`]s, which puts every structure back exactly as it was.
//!
//! Snapshots are plain data with an explicit version.  A snapshot whose
//! version this build does not understand is rejected before anything is
//! touched.
//!
//! [`lift`]: crate::LogisticsEngine::lift
//! [`commit`]: crate::LogisticsEngine::commit
//! [`cancel`]: crate::LogisticsEngine::cancel

use rustc_hash::FxHashMap;
use tracing::{debug, info, warn};

use rl_core::{
    CoreError, Footprint, GridQuery, Site, StructureHost, StructureId, StructureRegistry,
};
use rl_logistics::SupplyRoute;
use rl_roads::PathPlanner;

use crate::{LogisticsEngine, SimError, SimResult};

/// Layout version written into every snapshot.
pub const SNAPSHOT_VERSION: u32 = 1;

// ── StructureSnapshot ─────────────────────────────────────────────────────────

/// Everything needed to put a lifted structure back.
#[derive(Clone, Debug, PartialEq)]
pub struct StructureSnapshot {
    pub version:           u32,
    pub id:                StructureId,
    pub footprint:         Footprint,
    /// Production state before the lift.
    pub production_paused: bool,
    /// Supply routes released by the lift, as producer or consumer.
    pub routes:            Vec<SupplyRoute>,
}

impl StructureSnapshot {
    fn check_version(&self) -> SimResult<()> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SimError::SnapshotVersion {
                id:       self.id,
                found:    self.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        Ok(())
    }
}

// ── GroupMove ─────────────────────────────────────────────────────────────────

/// An open group move.  Consumed by `commit` or `cancel`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GroupMove {
    pub snapshots: Vec<StructureSnapshot>,
}

impl GroupMove {
    pub fn ids(&self) -> impl Iterator<Item = StructureId> + '_ {
        self.snapshots.iter().map(|s| s.id)
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

// ── Engine integration ────────────────────────────────────────────────────────

impl<W, P> LogisticsEngine<W, P>
where
    W: GridQuery + StructureRegistry + StructureHost,
    P: PathPlanner,
{
    /// Lift `ids` for a group move.
    ///
    /// Fails without side effects if any id is not a live structure.
    /// Duplicate ids are lifted once.
    pub fn lift(&mut self, ids: &[StructureId]) -> SimResult<GroupMove> {
        let mut footprints = Vec::with_capacity(ids.len());
        for &id in ids {
            if footprints.iter().any(|(seen, _)| *seen == id) {
                continue;
            }
            match self.world.structure_site(id) {
                Some(Site::Structure(fp)) => footprints.push((id, fp)),
                Some(Site::Cell(cell)) => footprints.push((id, Footprint::single(cell))),
                None => return Err(CoreError::StructureNotFound(id).into()),
            }
        }

        let mut group = GroupMove::default();
        for (id, footprint) in footprints {
            let production_paused = self.world.is_production_paused(id);
            let routes = self.coordinator.release_structure(id);
            self.world.set_production_paused(id, true)?;
            debug!(%id, released = routes.len(), "structure lifted");
            group.snapshots.push(StructureSnapshot {
                version: SNAPSHOT_VERSION,
                id,
                footprint,
                production_paused,
                routes,
            });
        }
        info!(structures = group.len(), "group move started");
        Ok(group)
    }

    /// Place every lifted structure at its new footprint and restore its
    /// production state.  Released routes stay released; producers pick
    /// consumers afresh.
    ///
    /// `placements` must name every structure in the group and nothing else.
    /// Fails without side effects if a lifted structure was destroyed in the
    /// meantime; the group can still be cancelled.
    pub fn commit(
        &mut self,
        group:      GroupMove,
        placements: &[(StructureId, Footprint)],
    ) -> SimResult<()> {
        let targets: FxHashMap<StructureId, Footprint> = placements.iter().copied().collect();
        for snapshot in &group.snapshots {
            snapshot.check_version()?;
            if !targets.contains_key(&snapshot.id) {
                return Err(SimError::MissingPlacement(snapshot.id));
            }
        }
        if let Some(&(stray, _)) =
            placements.iter().find(|(id, _)| group.snapshots.iter().all(|s| s.id != *id))
        {
            return Err(SimError::NotInGroup(stray));
        }
        if let Some(gone) = group.ids().find(|&id| !self.world.is_alive(id)) {
            return Err(CoreError::StructureNotFound(gone).into());
        }

        for snapshot in &group.snapshots {
            let footprint = targets[&snapshot.id];
            self.world.relocate(snapshot.id, footprint)?;
            self.world.set_production_paused(snapshot.id, snapshot.production_paused)?;
            debug!(id = %snapshot.id, root = %footprint.root, "structure placed");
        }
        info!(structures = group.len(), "group move committed");
        Ok(())
    }

    /// Put every lifted structure back: original footprint, original
    /// production state, released routes re-registered at the current tick.
    ///
    /// Structures destroyed while lifted are skipped, as are routes with a
    /// destroyed endpoint.  Everything else in the group is restored.
    pub fn cancel(&mut self, group: GroupMove) -> SimResult<()> {
        for snapshot in &group.snapshots {
            snapshot.check_version()?;
        }

        let now = self.clock.current_tick;
        for snapshot in &group.snapshots {
            if !self.world.is_alive(snapshot.id) {
                warn!(id = %snapshot.id, "lifted structure gone, not restored");
                continue;
            }
            self.world.relocate(snapshot.id, snapshot.footprint)?;
            self.world.set_production_paused(snapshot.id, snapshot.production_paused)?;
        }
        for route in group.snapshots.iter().flat_map(|s| &s.routes) {
            if !self.world.is_alive(route.producer) || !self.world.is_alive(route.consumer) {
                warn!(producer = %route.producer, consumer = %route.consumer, "route endpoint gone, not restored");
                continue;
            }
            self.coordinator.restore(*route, now);
        }
        info!(structures = group.len(), "group move cancelled");
        Ok(())
    }
}
