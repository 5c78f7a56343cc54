//! Per-cart travel state.

use rl_core::{GridCoord, Tick};

/// The travel state of a single cart.
///
/// A cart is either **parked** at `cell` (`in_transit = false`) or **moving**
/// along its stored path, in which case `cell` is the last path cell it has
/// fully reached and `travelled` counts cells covered so far, fractional
/// part included.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartState {
    pub in_transit: bool,

    /// Current cell.
    pub cell: GridCoord,

    /// Last cell of the path.  Equals `cell` while parked.
    pub destination: GridCoord,

    pub departure_tick: Tick,

    /// Cells covered since departure.
    pub travelled: f32,

    /// Path length in steps.  Zero while parked.
    pub steps: u32,
}

impl CartState {
    /// A cart parked at `cell` since `tick`.
    #[inline]
    pub fn parked(cell: GridCoord, tick: Tick) -> Self {
        Self {
            in_transit:     false,
            cell,
            destination:    cell,
            departure_tick: tick,
            travelled:      0.0,
            steps:          0,
        }
    }

    /// Fraction of the trip completed, in `[0.0, 1.0]`.  Parked carts and
    /// zero-length trips report `1.0`.
    pub fn progress(&self) -> f32 {
        if !self.in_transit || self.steps == 0 {
            return 1.0;
        }
        (self.travelled / self.steps as f32).min(1.0)
    }
}
