//! `rl-core` — foundational types for the road-logistics engine.
//!
//! This crate is a dependency of every other `rl-*` crate.  It has no `rl-*`
//! dependencies and only a handful of external ones (`serde`, `toml`,
//! `thiserror`, `rustc-hash`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                   |
//! |-------------|------------------------------------------------------------|
//! | [`ids`]     | `StructureId`, `AgentId`, `EmitterId`, `ResourceType`      |
//! | [`grid`]    | `GridCoord`, `Direction`, `Rotation`, `Footprint`, `Site`  |
//! | [`time`]    | `Tick`, `SimClock`                                         |
//! | [`config`]  | `LogisticsConfig` (TOML-loadable, validated)               |
//! | [`world`]   | Collaborator traits and the in-memory `GridWorld`          |
//! | [`error`]   | `CoreError`, `CoreResult`                                  |

pub mod config;
pub mod error;
pub mod grid;
pub mod ids;
pub mod time;
pub mod world;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::LogisticsConfig;
pub use error::{CoreError, CoreResult};
pub use grid::{Direction, Footprint, GridCoord, Rotation, Site};
pub use ids::{AgentId, EmitterId, ResourceType, StructureId};
pub use time::{SimClock, Tick};
pub use world::{GridQuery, GridWorld, StructureHost, StructureRecord, StructureRegistry};
