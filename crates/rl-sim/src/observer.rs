//! Engine observer trait for topology listeners and progress reporting.

use rl_core::{AgentId, GridCoord, Tick};

/// Callbacks invoked by [`LogisticsEngine`][crate::LogisticsEngine].
///
/// Every method has a default no-op implementation so implementors only
/// override what they care about.  Road callbacks fire synchronously, after
/// the graph mutation has completed, so a listener may query the graph
/// from inside them.
///
/// # Example — coverage invalidation
///
/// ```rust,ignore
/// struct Dirty(bool);
///
/// impl EngineObserver for Dirty {
///     fn on_road_added(&mut self, _cell: GridCoord)   { self.0 = true; }
///     fn on_road_removed(&mut self, _cell: GridCoord) { self.0 = true; }
/// }
/// ```
pub trait EngineObserver {
    /// A road node was added.  After a rebuild this fires once per node.
    fn on_road_added(&mut self, _cell: GridCoord) {}

    /// A road node was removed.
    fn on_road_removed(&mut self, _cell: GridCoord) {}

    /// The coordinator sweep ran and evicted `evicted` routes.
    fn on_sweep(&mut self, _tick: Tick, _evicted: usize) {}

    /// Called at the end of every `step`, with the carts that arrived.
    fn on_tick_end(&mut self, _tick: Tick, _arrivals: &[(AgentId, GridCoord)]) {}
}

/// An [`EngineObserver`] that does nothing.
pub struct NoopObserver;

impl EngineObserver for NoopObserver {}
