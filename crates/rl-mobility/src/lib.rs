//! `rl-mobility` — delivery carts travelling the road network.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                      |
//! |------------|---------------------------------------------------------------|
//! | [`state`]  | `CartState` — per-cart travel state                           |
//! | [`store`]  | `CartStore` — `Vec<CartState>` + sparse path map              |
//! | [`engine`] | `MobilityEngine<P>` — planning, per-tick advancement, arrivals |
//! | [`error`]  | `MobilityError`, `MobilityResult<T>`                          |
//!
//! # Movement model
//!
//! 1. `MobilityEngine::begin_delivery` plans a [`DeliveryPath`] through a
//!    pluggable [`PathPlanner`] in a single tick.
//! 2. Each tick a cart covers `speed × tick_secs × road_speed(cell)` cells,
//!    where `road_speed` is read from the world at the cart's current cell.
//! 3. `tick_arrivals` returns carts that reached the last cell and parks them
//!    there.
//!
//! The path is frozen when travel begins.  Roads removed under a moving cart
//! do not reroute it; it finishes the path it was given.
//!
//! [`DeliveryPath`]: rl_roads::DeliveryPath
//! [`PathPlanner`]: rl_roads::PathPlanner

pub mod engine;
pub mod error;
pub mod state;
pub mod store;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use engine::MobilityEngine;
pub use error::{MobilityError, MobilityResult};
pub use state::CartState;
pub use store::CartStore;
