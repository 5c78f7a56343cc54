//! Fluent builder for constructing a [`LogisticsEngine`].

use tracing::info;

use rl_core::{GridCoord, GridQuery, LogisticsConfig, StructureRegistry, Tick};
use rl_coverage::{CoverageEngine, Emitter};
use rl_logistics::{RequestBoard, SupplyCoordinator};
use rl_mobility::MobilityEngine;
use rl_roads::{PathPlanner, RoadGraph};

use crate::{LogisticsEngine, SimError, SimResult};

/// Fluent builder for [`LogisticsEngine<W, P>`].
///
/// # Required inputs
///
/// - `W: GridQuery + StructureRegistry` — the world the engine reads
/// - `P: PathPlanner` — the delivery planner (e.g. [`rl_roads::BfsPlanner`])
///
/// # Optional inputs (have defaults)
///
/// | Method          | Default                      |
/// |-----------------|------------------------------|
/// | `.config(c)`    | `LogisticsConfig::default()` |
/// | `.emitters(v)`  | none                         |
/// | `.carts(v)`     | none                         |
///
/// # Example
///
/// ```rust,ignore
/// let mut engine = EngineBuilder::new(world, BfsPlanner::default())
///     .config(config)
///     .carts(vec![GridCoord::new(0, 1)])
///     .build()?;
/// engine.step(&mut NoopObserver)?;
/// ```
pub struct EngineBuilder<W, P: PathPlanner> {
    world:    W,
    planner:  P,
    config:   LogisticsConfig,
    emitters: Vec<Emitter>,
    carts:    Vec<GridCoord>,
}

impl<W, P> EngineBuilder<W, P>
where
    W: GridQuery + StructureRegistry,
    P: PathPlanner,
{
    pub fn new(world: W, planner: P) -> Self {
        Self {
            world,
            planner,
            config:   LogisticsConfig::default(),
            emitters: Vec::new(),
            carts:    Vec::new(),
        }
    }

    pub fn config(mut self, config: LogisticsConfig) -> Self {
        self.config = config;
        self
    }

    /// Coverage emitters registered at build time, in handle order.
    pub fn emitters(mut self, emitters: Vec<Emitter>) -> Self {
        self.emitters = emitters;
        self
    }

    /// Starting cells of delivery carts, in handle order.
    pub fn carts(mut self, carts: Vec<GridCoord>) -> Self {
        self.carts = carts;
        self
    }

    /// Validate the configuration, build the road graph from the world and
    /// return a ready-to-step engine.
    pub fn build(self) -> SimResult<LogisticsEngine<W, P>> {
        self.config.validate()?;

        let clock = self.config.make_clock();
        let sweep_interval_ticks = clock.ticks_for_secs(self.config.sweep_interval_secs);
        if sweep_interval_ticks == 0 {
            return Err(SimError::Config("sweep interval rounds to zero ticks".into()));
        }

        // ── Road graph ────────────────────────────────────────────────────
        let graph = RoadGraph::from_tiles(self.world.road_tiles());

        // ── Coverage ──────────────────────────────────────────────────────
        let mut coverage = CoverageEngine::from_config(&self.config);
        for emitter in self.emitters {
            coverage.register(emitter)?;
        }

        // ── Carts ─────────────────────────────────────────────────────────
        let mut mobility = MobilityEngine::new(self.planner, self.config.cart_speed_cells_per_sec);
        for cell in self.carts {
            mobility.spawn(cell, Tick::ZERO)?;
        }

        info!(
            roads = graph.len(),
            emitters = coverage.len(),
            carts = mobility.cart_count(),
            tick_ms = self.config.tick_duration_ms,
            "logistics engine built"
        );

        Ok(LogisticsEngine {
            coordinator: SupplyCoordinator::from_config(&self.config),
            board: RequestBoard::new(),
            clock,
            config: self.config,
            world: self.world,
            graph,
            coverage,
            mobility,
            sweep_interval_ticks,
            next_sweep: Tick(sweep_interval_ticks),
        })
    }
}
