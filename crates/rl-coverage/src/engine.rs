//! Emitter registry and coverage evaluation.
//!
//! # Algorithm
//!
//! For each emitter:
//!
//! 1. `m = max_steps(radius, cell_size)`
//! 2. seeds = access points of the emitter's site
//! 3. one bounded multi-source BFS from the seeds, budget `m`
//! 4. every reached road cell gets `efficiency(d, m)`
//!
//! Overlapping emitters do not stack: each cell keeps the best value.
//! Nothing is cached; roads placed this tick are covered on the next query.

use rustc_hash::FxHashMap;
use tracing::trace;

use rl_core::{CoreError, EmitterId, GridCoord, LogisticsConfig, Site};
use rl_roads::Pathfinder;

use crate::efficiency::{efficiency, max_steps};
use crate::emitter::{Emitter, ServiceKind};
use crate::{CoverageError, CoverageResult};

/// Efficiency in `[0, 1]` per covered road cell.
pub type CoverageMap = FxHashMap<GridCoord, f32>;

/// Registered emitters plus the grid scale they are measured in.
///
/// Removed emitters leave a hole; their handles are never reissued.
#[derive(Clone, Debug)]
pub struct CoverageEngine {
    emitters:  Vec<Option<Emitter>>,
    cell_size: f32,
}

impl CoverageEngine {
    pub fn new(cell_size: f32) -> Self {
        Self { emitters: Vec::new(), cell_size }
    }

    pub fn from_config(config: &LogisticsConfig) -> Self {
        Self::new(config.cell_size)
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    // ── Registry ──────────────────────────────────────────────────────────

    pub fn register(&mut self, emitter: Emitter) -> CoverageResult<EmitterId> {
        if !(emitter.radius.is_finite() && emitter.radius >= 0.0) {
            return Err(CoverageError::InvalidRadius(emitter.radius));
        }
        let id = EmitterId::try_from(self.emitters.len())
            .map_err(|_| CoreError::HandlesExhausted("emitter"))?;
        self.emitters.push(Some(emitter));
        Ok(id)
    }

    pub fn unregister(&mut self, id: EmitterId) -> Option<Emitter> {
        self.emitters.get_mut(id.index()).and_then(Option::take)
    }

    pub fn emitter(&self, id: EmitterId) -> Option<&Emitter> {
        self.emitters.get(id.index()).and_then(Option::as_ref)
    }

    /// Move an emitter, e.g. after its building was relocated.
    pub fn set_site(&mut self, id: EmitterId, site: Site) -> bool {
        match self.emitters.get_mut(id.index()).and_then(Option::as_mut) {
            Some(e) => {
                e.site = site;
                true
            }
            None => false,
        }
    }

    pub fn emitters(&self) -> impl Iterator<Item = (EmitterId, &Emitter)> {
        self.emitters
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.as_ref().map(|e| (EmitterId(i as u32), e)))
    }

    pub fn len(&self) -> usize {
        self.emitters.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ── Evaluation ────────────────────────────────────────────────────────

    /// Merged coverage of an explicit set of emitters.
    pub fn coverage_for<'e, I>(&self, emitters: I, finder: &Pathfinder<'_>) -> CoverageMap
    where
        I: IntoIterator<Item = &'e Emitter>,
    {
        let mut merged = CoverageMap::default();
        for emitter in emitters {
            let budget = max_steps(emitter.radius, self.cell_size);
            let seeds = finder.access_points(&emitter.site);
            if seeds.is_empty() {
                trace!(kind = %emitter.kind, "emitter has no road access");
                continue;
            }
            for (cell, d) in finder.distances_multi(seeds, budget) {
                let eff = efficiency(d, budget);
                merged
                    .entry(cell)
                    .and_modify(|best| *best = best.max(eff))
                    .or_insert(eff);
            }
        }
        merged
    }

    /// Merged coverage of every registered emitter.
    pub fn coverage_all(&self, finder: &Pathfinder<'_>) -> CoverageMap {
        self.coverage_for(self.emitters.iter().flatten(), finder)
    }

    /// Merged coverage of the registered emitters of one kind.
    pub fn coverage_for_kind(&self, kind: ServiceKind, finder: &Pathfinder<'_>) -> CoverageMap {
        self.coverage_for(self.emitters.iter().flatten().filter(|e| e.kind == kind), finder)
    }

    /// Does any emitter of `kind` reach one of `site`'s access points with
    /// non-zero strength?
    pub fn is_served(&self, site: &Site, kind: ServiceKind, finder: &Pathfinder<'_>) -> bool {
        let access = finder.access_points(site);
        if access.is_empty() {
            return false;
        }
        let coverage = self.coverage_for_kind(kind, finder);
        access.iter().any(|p| coverage.get(p).is_some_and(|&eff| eff > 0.0))
    }
}
