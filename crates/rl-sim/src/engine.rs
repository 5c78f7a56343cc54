//! The `LogisticsEngine` facade and its tick loop.

use tracing::{debug, warn};

use rl_core::{
    AgentId, CoreError, EmitterId, GridCoord, GridQuery, LogisticsConfig, ResourceType, SimClock, Site,
    StructureId, StructureRegistry, Tick,
};
use rl_coverage::{CoverageEngine, CoverageMap, Emitter, ServiceKind};
use rl_logistics::{
    best_request_for, MatchedRequest, Priority, RequestBoard, ResourceRequest, RequestKey,
    SupplyCoordinator,
};
use rl_mobility::MobilityEngine;
use rl_roads::{DeliveryPath, PathPlanner, Pathfinder, RoadGraph};

use crate::{EngineObserver, SimResult};

/// The road-logistics engine.
///
/// Owns the road graph, the request board, the supply coordinator, the
/// coverage registry and the delivery carts, and reads everything else from
/// the world `W`.  All state is reached through explicit fields; there are
/// no globals.
///
/// # Tick contract
///
/// Topology changes (`place_road`, `remove_road`, `rebuild_from_world`)
/// happen first in a tick, queries after.  [`step`](Self::step) then
/// advances the clock, moves the carts and runs the coordinator sweep when
/// its deadline is due.
///
/// Create via [`EngineBuilder`][crate::EngineBuilder].
pub struct LogisticsEngine<W, P: PathPlanner> {
    pub config: LogisticsConfig,

    /// Tracks the current tick and maps ticks to seconds.
    pub clock: SimClock,

    /// Grid and structure registry.  The engine never writes to it except
    /// through group moves.
    pub world: W,

    pub board: RequestBoard,

    pub coordinator: SupplyCoordinator,

    pub coverage: CoverageEngine,

    pub mobility: MobilityEngine<P>,

    pub(crate) graph: RoadGraph,

    pub(crate) sweep_interval_ticks: u64,

    /// First tick at which the next coordinator sweep runs.
    pub(crate) next_sweep: Tick,
}

impl<W, P> LogisticsEngine<W, P>
where
    W: GridQuery + StructureRegistry,
    P: PathPlanner,
{
    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn now(&self) -> Tick {
        self.clock.current_tick
    }

    pub fn graph(&self) -> &RoadGraph {
        &self.graph
    }

    /// A pathfinder over the current graph with the configured limits.
    pub fn pathfinder(&self) -> Pathfinder<'_> {
        Pathfinder::from_config(&self.graph, &self.config)
    }

    // ── Topology ──────────────────────────────────────────────────────────

    /// Add a road node at `cell`.  Returns `false` if it was already there.
    pub fn place_road<O: EngineObserver>(&mut self, cell: GridCoord, observer: &mut O) -> bool {
        if !self.world.is_road_at(cell) {
            warn!(%cell, "road placed where the world has none");
        }
        if !self.graph.insert(cell) {
            return false;
        }
        debug!(%cell, "road added");
        observer.on_road_added(cell);
        true
    }

    /// Remove the road node at `cell`.  Carts already travelling over it
    /// keep their path.
    pub fn remove_road<O: EngineObserver>(&mut self, cell: GridCoord, observer: &mut O) -> bool {
        if !self.graph.remove(cell) {
            return false;
        }
        debug!(%cell, "road removed");
        observer.on_road_removed(cell);
        true
    }

    /// Replace the graph with the world's current road tiles.  Fires
    /// `on_road_added` for every node, in coordinate order.
    pub fn rebuild_from_world<O: EngineObserver>(&mut self, observer: &mut O) {
        self.graph.rebuild(self.world.road_tiles());
        let mut cells: Vec<GridCoord> = self.graph.nodes().collect();
        cells.sort_unstable();
        debug!(nodes = cells.len(), edges = self.graph.edge_count(), "road graph rebuilt");
        for cell in cells {
            observer.on_road_added(cell);
        }
    }

    // ── Path queries ──────────────────────────────────────────────────────

    pub fn reachable(&self, start: GridCoord, end: GridCoord) -> bool {
        self.pathfinder().reachable(start, end)
    }

    /// Delivery path between two sites through the configured planner.
    pub fn find_path(&self, from: &Site, to: &Site) -> Option<DeliveryPath> {
        self.mobility.planner.plan(&self.graph, from, to)
    }

    // ── Requests ──────────────────────────────────────────────────────────

    /// Post a delivery request.  Returns `false` if `requester` already has
    /// one open for `resource`.
    pub fn submit_request(
        &mut self,
        requester:   StructureId,
        resource:    ResourceType,
        priority:    u8,
        destination: GridCoord,
    ) -> SimResult<bool> {
        let priority = Priority::new(priority)?;
        let request = ResourceRequest::new(requester, resource, priority, destination);
        Ok(self.board.submit(request))
    }

    pub fn withdraw_request(
        &mut self,
        requester: StructureId,
        resource:  ResourceType,
    ) -> Option<ResourceRequest> {
        self.board.withdraw(RequestKey { requester, resource })
    }

    /// Best request for an agent at `agent` carrying `resource`, within
    /// `range` world units (the configured default when `None`).
    pub fn best_request_for(
        &self,
        agent:    &Site,
        resource: ResourceType,
        range:    Option<f32>,
    ) -> Option<MatchedRequest> {
        let radius = range.unwrap_or(self.config.default_request_range);
        let steps = self.config.range_steps(radius);
        best_request_for(agent, resource, steps, &self.pathfinder(), &self.board, &self.world)
    }

    // ── Supply arbitration ────────────────────────────────────────────────

    /// Pin `producer` to `consumer` at the current tick.
    pub fn register_supply(
        &mut self,
        producer: StructureId,
        consumer: StructureId,
        resource: ResourceType,
    ) -> SimResult<()> {
        let site = self
            .world
            .structure_site(producer)
            .ok_or(CoreError::StructureNotFound(producer))?;
        let now = self.now();
        self.coordinator.register(producer, consumer, resource, site, now);
        Ok(())
    }

    pub fn unregister_supply(&mut self, producer: StructureId, consumer: StructureId) -> bool {
        self.coordinator.unregister(producer, consumer)
    }

    pub fn is_reserved(&mut self, consumer: StructureId, requesting: StructureId) -> bool {
        let now = self.clock.current_tick;
        let finder = Pathfinder::from_config(&self.graph, &self.config);
        self.coordinator.is_reserved(consumer, requesting, now, &finder, &self.world)
    }

    pub fn should_use_exclusive_reservation(
        &self,
        producer: StructureId,
        resource: ResourceType,
    ) -> bool {
        self.coordinator
            .should_use_exclusive_reservation(producer, resource, &self.pathfinder(), &self.world)
    }

    // ── Coverage ──────────────────────────────────────────────────────────

    pub fn register_emitter(&mut self, emitter: Emitter) -> SimResult<EmitterId> {
        Ok(self.coverage.register(emitter)?)
    }

    pub fn unregister_emitter(&mut self, id: EmitterId) -> Option<Emitter> {
        self.coverage.unregister(id)
    }

    /// Per-tile efficiency of every emitter of `kind`.
    pub fn coverage_for(&self, kind: ServiceKind) -> CoverageMap {
        self.coverage.coverage_for_kind(kind, &self.pathfinder())
    }

    pub fn is_served(&self, site: &Site, kind: ServiceKind) -> bool {
        self.coverage.is_served(site, kind, &self.pathfinder())
    }

    // ── Carts ─────────────────────────────────────────────────────────────

    pub fn spawn_cart(&mut self, cell: GridCoord) -> SimResult<AgentId> {
        let now = self.now();
        Ok(self.mobility.spawn(cell, now)?)
    }

    /// Send a parked cart to `to`.  `Ok(None)` when no road connects them.
    pub fn dispatch_cart(&mut self, agent: AgentId, to: &Site) -> SimResult<Option<usize>> {
        let now = self.clock.current_tick;
        Ok(self.mobility.begin_delivery(agent, to, &self.graph, now)?)
    }

    // ── Tick loop ─────────────────────────────────────────────────────────

    /// Advance one tick: move carts, then sweep the coordinator if its
    /// deadline has come.  Returns the carts that arrived.
    pub fn step<O: EngineObserver>(&mut self, observer: &mut O) -> Vec<(AgentId, GridCoord)> {
        self.clock.advance();
        let now = self.clock.current_tick;

        let arrivals = self.mobility.tick_arrivals(now, self.clock.tick_secs(), &self.world);

        if now >= self.next_sweep {
            let evicted = self.coordinator.sweep(now, &self.world);
            self.next_sweep = now.offset(self.sweep_interval_ticks);
            observer.on_sweep(now, evicted);
        }

        observer.on_tick_end(now, &arrivals);
        arrivals
    }

    /// Run exactly `n` ticks.  Returns every arrival in order.
    pub fn run_ticks<O: EngineObserver>(
        &mut self,
        n:        u64,
        observer: &mut O,
    ) -> Vec<(AgentId, GridCoord)> {
        let mut all = Vec::new();
        for _ in 0..n {
            all.extend(self.step(observer));
        }
        all
    }
}
