//! High-level mobility engine: plans deliveries and advances carts.

use tracing::{debug, trace};

use rl_core::{AgentId, GridCoord, GridQuery, Site, Tick};
use rl_roads::{DeliveryPath, PathPlanner, RoadGraph};

use crate::{CartState, CartStore, MobilityError, MobilityResult};

/// Wraps a [`PathPlanner`] and a [`CartStore`].
///
/// # Type parameter
///
/// `P` must implement [`PathPlanner`] (e.g. [`rl_roads::BfsPlanner`]).
pub struct MobilityEngine<P: PathPlanner> {
    pub planner: P,

    /// All per-cart state and frozen paths.
    pub store: CartStore,

    /// Cells per second on a road with multiplier 1.0.
    pub speed_cells_per_sec: f32,
}

impl<P: PathPlanner> MobilityEngine<P> {
    pub fn new(planner: P, speed_cells_per_sec: f32) -> Self {
        Self {
            planner,
            store: CartStore::new(),
            speed_cells_per_sec,
        }
    }

    /// Add a cart parked at `cell`.
    pub fn spawn(&mut self, cell: GridCoord, now: Tick) -> MobilityResult<AgentId> {
        self.store.spawn(cell, now)
    }

    /// Teleport a parked cart to `cell`.
    pub fn place(&mut self, agent: AgentId, cell: GridCoord, now: Tick) -> MobilityResult<()> {
        if self.store.get(agent)?.in_transit {
            return Err(MobilityError::AlreadyInTransit(agent));
        }
        self.store.states[agent.index()] = CartState::parked(cell, now);
        Ok(())
    }

    /// Plan a path from the cart's cell to `to` and start travelling.
    ///
    /// Returns the number of steps in the planned path, or `Ok(None)` when no
    /// road connects the cart to `to`; the cart then stays parked.
    pub fn begin_delivery(
        &mut self,
        agent: AgentId,
        to:    &Site,
        graph: &RoadGraph,
        now:   Tick,
    ) -> MobilityResult<Option<usize>> {
        let state = self.store.get(agent)?;
        if state.in_transit {
            return Err(MobilityError::AlreadyInTransit(agent));
        }
        let from = Site::Cell(state.cell);
        let Some(path) = self.planner.plan(graph, &from, to) else {
            debug!(%agent, ?to, "no delivery path");
            return Ok(None);
        };
        let steps = path.steps();
        debug!(%agent, from = ?path.start(), to = ?path.end(), steps, "delivery started");
        self.store.begin(agent, path, now)?;
        Ok(Some(steps))
    }

    /// Start travelling along a path the caller already holds.
    pub fn begin_path(&mut self, agent: AgentId, path: DeliveryPath, now: Tick) -> MobilityResult<()> {
        self.store.begin(agent, path, now)
    }

    /// Advance every moving cart by one tick and park those that reach the
    /// end of their path.
    ///
    /// Speed is read from `grid` at the cell the cart stands on when the
    /// tick starts.  Returns `(AgentId, GridCoord)` for every arrival, in
    /// id order.
    pub fn tick_arrivals<G: GridQuery + ?Sized>(
        &mut self,
        now:       Tick,
        tick_secs: f32,
        grid:      &G,
    ) -> Vec<(AgentId, GridCoord)> {
        let moving: Vec<(AgentId, GridCoord)> = self.store.states
            .iter()
            .enumerate()
            .filter(|(_, s)| s.in_transit)
            .map(|(i, s)| (AgentId(i as u32), s.cell))
            .collect();

        let mut arrivals = Vec::new();
        for (agent, cell) in moving {
            let cells = self.speed_cells_per_sec * tick_secs * grid.road_speed(cell).max(0.0);
            match self.store.advance(agent, cells) {
                Ok(true) => {
                    if let Ok(dest) = self.store.arrive(agent, now) {
                        trace!(%agent, ?dest, %now, "cart arrived");
                        arrivals.push((agent, dest));
                    }
                }
                Ok(false) => {}
                Err(e) => debug!(%agent, error = %e, "cart skipped"),
            }
        }
        arrivals
    }

    /// Current cell of `agent`.
    pub fn position(&self, agent: AgentId) -> Option<GridCoord> {
        self.store.get(agent).ok().map(|s| s.cell)
    }

    /// `(current cell, destination, progress)` for interpolated drawing.
    pub fn visual_position(&self, agent: AgentId) -> Option<(GridCoord, GridCoord, f32)> {
        let s = self.store.get(agent).ok()?;
        Some((s.cell, s.destination, s.progress()))
    }

    #[inline]
    pub fn in_transit(&self, agent: AgentId) -> bool {
        self.store.in_transit(agent)
    }

    /// Cells still ahead of `agent`.  Empty while parked.
    pub fn remaining_path(&self, agent: AgentId) -> &[GridCoord] {
        self.store.remaining_path(agent)
    }

    pub fn cart_count(&self) -> usize {
        self.store.len()
    }
}
