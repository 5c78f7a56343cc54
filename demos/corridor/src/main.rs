//! corridor — headless run of the road-logistics engine.
//!
//! Two farms ship grain to two mills over a small village road network.
//! Mills post requests when their store runs low, farm carts pick the best
//! request, producers arbitrate who serves which mill, and half-way through
//! one mill is moved with a group-move transaction.  A detached hamlet shows
//! that separate road networks never contend.
//!
//! ```text
//! cargo run -p corridor                       # default configuration
//! cargo run -p corridor -- village.toml       # TOML overrides
//! RUST_LOG=debug cargo run -p corridor        # engine-level events
//! ```

mod layout;

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use rl_core::{
    AgentId, Footprint, GridCoord, GridQuery, GridWorld, LogisticsConfig, Site, StructureId,
    StructureRegistry, Tick,
};
use rl_coverage::{Emitter, ServiceKind};
use rl_logistics::{DemandChange, DemandTracker, Priority};
use rl_roads::BfsPlanner;
use rl_sim::{EngineBuilder, EngineObserver, LogisticsEngine};

use layout::{build_village, GRAIN};

// ── Constants ─────────────────────────────────────────────────────────────────

const TOTAL_TICKS:    u64 = 600;
const MOVE_AT_TICK:   u64 = 300;
const CUT_AT_TICK:    u64 = 450;
const MILL_CAPACITY:  f32 = 10.0;
const MILL_USE:       f32 = 0.05; // grain milled per tick
const CART_LOAD:      f32 = 4.0;
const WATER:          ServiceKind = ServiceKind(0);

// ── Observer ──────────────────────────────────────────────────────────────────

#[derive(Default)]
struct VillageLog {
    roads_added:   usize,
    roads_removed: usize,
    evicted:       usize,
}

impl EngineObserver for VillageLog {
    fn on_road_added(&mut self, _cell: GridCoord) {
        self.roads_added += 1;
    }

    fn on_road_removed(&mut self, cell: GridCoord) {
        self.roads_removed += 1;
        info!(%cell, "road demolished");
    }

    fn on_sweep(&mut self, _tick: Tick, evicted: usize) {
        self.evicted += evicted;
    }
}

// ── Cart bookkeeping ──────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
enum Trip {
    Idle,
    Outbound { mill: StructureId },
    Returning,
}

struct Cart {
    id:   AgentId,
    farm: StructureId,
    trip: Trip,
}

struct Mill {
    id:        StructureId,
    stock:     f32,
    delivered: u32,
    demand:    DemandTracker,
}

type Engine = LogisticsEngine<GridWorld, BfsPlanner>;

fn site_of(engine: &Engine, id: StructureId) -> Result<Site> {
    engine.world.structure_site(id).with_context(|| format!("{id} is not in the world"))
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => LogisticsConfig::from_toml_file(Path::new(&path))
            .with_context(|| format!("loading {path}"))?,
        None => LogisticsConfig::default(),
    };

    let village = build_village()?;
    let mut engine = EngineBuilder::new(village.world, BfsPlanner::from_config(&config))
        .config(config)
        .emitters(vec![Emitter::new(WATER, Site::Cell(GridCoord::new(5, 1)), 6.0)])
        .build()?;
    let mut log = VillageLog::default();
    engine.rebuild_from_world(&mut log);

    // ── Actors ────────────────────────────────────────────────────────────
    let mut carts = Vec::new();
    for &farm in &village.farms {
        let home = site_of(&engine, farm)?.anchor();
        carts.push(Cart { id: engine.spawn_cart(home)?, farm, trip: Trip::Idle });
    }

    let mut mills = Vec::new();
    for &id in village.mills.iter().chain(std::iter::once(&village.hamlet)) {
        let root = site_of(&engine, id)?.anchor();
        mills.push(Mill {
            id,
            stock: MILL_CAPACITY * 0.5,
            delivered: 0,
            demand: DemandTracker::new(id, root, Priority::new(3)?),
        });
    }

    for &farm in &village.farms {
        let exclusive = engine.should_use_exclusive_reservation(farm, GRAIN);
        info!(%farm, exclusive, "reservation mode");
    }

    // ── Tick loop ─────────────────────────────────────────────────────────
    for _ in 0..TOTAL_TICKS {
        let now = engine.now();

        if now.0 == MOVE_AT_TICK {
            relocate_mill(&mut engine, &mut mills[0])?;
        }
        if now.0 == CUT_AT_TICK {
            let cut = GridCoord::new(10, 0);
            engine.world.remove_road(cut);
            engine.remove_road(cut, &mut log);
        }

        // Mills consume and update their requests.
        for mill in &mut mills {
            mill.stock = (mill.stock - MILL_USE).max(0.0);
            if let Some(DemandChange::Requested(_)) =
                mill.demand.observe(GRAIN, mill.stock, MILL_CAPACITY, &mut engine.board)
            {
                info!(mill = %mill.id, stock = mill.stock, %now, "grain requested");
            }
        }

        // Idle carts look for work.
        for cart in &mut carts {
            if cart.trip == Trip::Idle {
                dispatch_idle(&mut engine, cart)?;
            }
        }

        // Move carts and handle arrivals.
        for (agent, cell) in engine.step(&mut log) {
            let Some(cart) = carts.iter_mut().find(|c| c.id == agent) else {
                continue;
            };
            match cart.trip {
                Trip::Outbound { mill } => {
                    if let Some(m) = mills.iter_mut().find(|m| m.id == mill) {
                        m.stock = (m.stock + CART_LOAD).min(MILL_CAPACITY);
                        m.delivered += 1;
                        m.demand.observe(GRAIN, m.stock, MILL_CAPACITY, &mut engine.board);
                        info!(%mill, %cell, stock = m.stock, "grain delivered");
                    }
                    engine.unregister_supply(cart.farm, mill);
                    let home = site_of(&engine, cart.farm)?;
                    cart.trip = match engine.dispatch_cart(agent, &home)? {
                        Some(_) => Trip::Returning,
                        None => Trip::Idle,
                    };
                }
                Trip::Returning => cart.trip = Trip::Idle,
                Trip::Idle => {}
            }
        }
    }

    // ── Summary ───────────────────────────────────────────────────────────
    for mill in &mills {
        info!(mill = %mill.id, deliveries = mill.delivered, stock = mill.stock, "final");
    }
    let water = engine.coverage_for(WATER);
    let served = water.values().filter(|&&e| e > 0.0).count();
    info!(
        clock = %engine.clock,
        roads = engine.graph().len(),
        roads_added = log.roads_added,
        roads_removed = log.roads_removed,
        routes_evicted = log.evicted,
        open_requests = engine.board.len(),
        water_tiles = served,
        "run complete"
    );
    Ok(())
}

/// Send an idle cart to the best open request, respecting reservations.
fn dispatch_idle(engine: &mut Engine, cart: &mut Cart) -> Result<()> {
    let farm_site = site_of(engine, cart.farm)?;
    let Some(matched) = engine.best_request_for(&farm_site, GRAIN, None) else {
        return Ok(());
    };
    let mill = matched.request.requester;

    if engine.should_use_exclusive_reservation(cart.farm, GRAIN) {
        if engine.is_reserved(mill, cart.farm) {
            return Ok(());
        }
        engine.register_supply(cart.farm, mill, GRAIN)?;
    }

    let to = site_of(engine, mill)?;
    if engine.dispatch_cart(cart.id, &to)?.is_some() {
        info!(cart = %cart.id, farm = %cart.farm, %mill, distance = matched.distance, "cart dispatched");
        cart.trip = Trip::Outbound { mill };
    }
    Ok(())
}

/// Move a mill one cell west along the lane, with a full lift/commit.
fn relocate_mill(engine: &mut Engine, mill: &mut Mill) -> Result<()> {
    let group = engine.lift(&[mill.id])?;
    let Some(snapshot) = group.snapshots.first() else {
        warn!(mill = %mill.id, "nothing lifted");
        return Ok(());
    };
    let target = Footprint::single(GridCoord::new(6, 4));
    if engine.world.footprint_at(target.root).is_some() {
        warn!(mill = %mill.id, "target occupied, move cancelled");
        engine.cancel(group)?;
        return Ok(());
    }
    info!(mill = %mill.id, from = %snapshot.footprint.root, to = %target.root, "moving mill");
    engine.commit(group, &[(mill.id, target)])?;

    mill.demand.cancel_all(&mut engine.board);
    mill.demand.set_destination(target.root);
    mill.demand.observe(GRAIN, mill.stock, MILL_CAPACITY, &mut engine.board);
    Ok(())
}
