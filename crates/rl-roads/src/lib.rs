//! `rl-roads` — road graph, breadth-first queries, and routing.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                 |
//! |----------------|----------------------------------------------------------|
//! | [`graph`]      | `RoadGraph`, `RoadNode` (symmetric 4-neighbour adjacency)|
//! | [`pathfinder`] | `Pathfinder`, `DistanceMap`: reachability, BFS distances, path reconstruction, access points |
//! | [`path`]       | `DeliveryPath`                                           |
//! | [`planner`]    | `PathPlanner` trait, `BfsPlanner`                        |
//! | [`loader`]     | `load_road_tiles_csv` for scene loading                  |
//! | [`error`]      | `RoadError`, `RoadResult<T>`, `PathDefect`               |
//!
//! # Cost model
//!
//! Every edge costs one step.  Road speed multipliers are a property of the
//! agent travelling the road (see `rl-mobility`), never of the search.

pub mod error;
pub mod graph;
pub mod loader;
pub mod path;
pub mod pathfinder;
pub mod planner;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{PathDefect, RoadError, RoadResult};
pub use graph::{RoadGraph, RoadNode};
pub use loader::{load_road_tiles_csv, load_road_tiles_reader};
pub use path::DeliveryPath;
pub use pathfinder::{DistanceMap, Pathfinder};
pub use planner::{BfsPlanner, PathPlanner};
