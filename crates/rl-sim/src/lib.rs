//! `rl-sim` — the road-logistics engine facade.
//!
//! # Tick model
//!
//! ```text
//! each tick:
//!   ① Topology  — place_road / remove_road / rebuild_from_world;
//!                 observers fire after each mutation.
//!   ② Queries   — best_request_for, is_reserved, coverage_for, find_path, …
//!   ③ step()    — advance the clock, move carts along frozen paths,
//!                 sweep the supply coordinator when its deadline is due.
//! ```
//!
//! # Crate layout
//!
//! | Module         | Contents                                              |
//! |----------------|-------------------------------------------------------|
//! | [`engine`]     | `LogisticsEngine<W, P>` — the facade and tick loop    |
//! | [`builder`]    | `EngineBuilder` — validated construction              |
//! | [`observer`]   | `EngineObserver`, `NoopObserver`                      |
//! | [`relocation`] | `GroupMove`, `StructureSnapshot` — lift/commit/cancel |
//! | [`error`]      | `SimError`, `SimResult<T>`                            |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use rl_core::{GridCoord, GridWorld};
//! use rl_roads::BfsPlanner;
//! use rl_sim::{EngineBuilder, NoopObserver};
//!
//! let mut world = GridWorld::new();
//! world.add_road_line(GridCoord::new(0, 0), GridCoord::new(9, 0));
//! let mut engine = EngineBuilder::new(world, BfsPlanner::default()).build()?;
//! engine.run_ticks(100, &mut NoopObserver);
//! ```

pub mod builder;
pub mod engine;
pub mod error;
pub mod observer;
pub mod relocation;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use builder::EngineBuilder;
pub use engine::LogisticsEngine;
pub use error::{SimError, SimResult};
pub use observer::{EngineObserver, NoopObserver};
pub use relocation::{GroupMove, StructureSnapshot, SNAPSHOT_VERSION};
