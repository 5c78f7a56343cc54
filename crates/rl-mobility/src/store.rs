//! The `CartStore` — per-cart state and sparse path map.

use rustc_hash::FxHashMap;

use rl_core::{AgentId, CoreError, GridCoord, Tick};
use rl_roads::DeliveryPath;

use crate::{CartState, MobilityError, MobilityResult};

/// Holds the state of every cart plus the frozen path of each moving one.
///
/// `states` is indexed by `AgentId`.  `paths` only has entries for carts in
/// transit; an entry is dropped on arrival.
#[derive(Debug, Default)]
pub struct CartStore {
    pub states: Vec<CartState>,
    pub paths:  FxHashMap<AgentId, DeliveryPath>,
}

impl CartStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a cart parked at `cell`.
    pub fn spawn(&mut self, cell: GridCoord, now: Tick) -> MobilityResult<AgentId> {
        let id = AgentId::try_from(self.states.len())
            .map_err(|_| CoreError::HandlesExhausted("cart"))?;
        self.states.push(CartState::parked(cell, now));
        Ok(id)
    }

    pub fn get(&self, agent: AgentId) -> MobilityResult<&CartState> {
        self.states.get(agent.index()).ok_or(MobilityError::UnknownCart(agent))
    }

    fn get_mut(&mut self, agent: AgentId) -> MobilityResult<&mut CartState> {
        self.states.get_mut(agent.index()).ok_or(MobilityError::UnknownCart(agent))
    }

    /// Put `agent` on `path`.  The cart jumps to the first path cell.
    pub fn begin(&mut self, agent: AgentId, path: DeliveryPath, now: Tick) -> MobilityResult<()> {
        let state = self.get_mut(agent)?;
        if state.in_transit {
            return Err(MobilityError::AlreadyInTransit(agent));
        }
        *state = CartState {
            in_transit:     true,
            cell:           path.start(),
            destination:    path.end(),
            departure_tick: now,
            travelled:      0.0,
            steps:          path.steps() as u32,
        };
        self.paths.insert(agent, path);
        Ok(())
    }

    /// Move `agent` forward by `cells`.  Returns `true` once the cart has
    /// reached the end of its path.  Parked carts do not move.
    pub fn advance(&mut self, agent: AgentId, cells: f32) -> MobilityResult<bool> {
        let state = self.states.get_mut(agent.index()).ok_or(MobilityError::UnknownCart(agent))?;
        if !state.in_transit {
            return Ok(false);
        }
        let Some(path) = self.paths.get(&agent) else {
            return Ok(true);
        };
        state.travelled = (state.travelled + cells.max(0.0)).min(state.steps as f32);
        let idx = (state.travelled.floor() as usize).min(path.steps());
        state.cell = path.cells()[idx];
        Ok(state.travelled >= state.steps as f32)
    }

    /// Park `agent` at its destination and drop its path.
    pub fn arrive(&mut self, agent: AgentId, now: Tick) -> MobilityResult<GridCoord> {
        let state = self.get_mut(agent)?;
        let dest = state.destination;
        *state = CartState::parked(dest, now);
        self.paths.remove(&agent);
        Ok(dest)
    }

    /// Cells still ahead of `agent`, excluding the one it stands on.
    pub fn remaining_path(&self, agent: AgentId) -> &[GridCoord] {
        let (Some(state), Some(path)) = (self.states.get(agent.index()), self.paths.get(&agent))
        else {
            return &[];
        };
        let idx = (state.travelled.floor() as usize).min(path.steps());
        &path.cells()[idx + 1..]
    }

    #[inline]
    pub fn in_transit(&self, agent: AgentId) -> bool {
        self.states.get(agent.index()).is_some_and(|s| s.in_transit)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
