//! `rl-logistics` — delivery requests and supply arbitration.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`request`]     | `Priority`, `ResourceRequest`, `RequestKey`               |
//! | [`board`]       | `RequestBoard` — outstanding requests bucketed by type    |
//! | [`matcher`]     | `best_request_for`, `MatchedRequest`                      |
//! | [`coordinator`] | `SupplyCoordinator`, `SupplyRoute` — exclusive reservations |
//! | [`demand`]      | `DemandTracker` — buffer-level hysteresis driving the board |
//! | [`error`]       | `LogisticsError`, `LogisticsResult<T>`                    |
//!
//! # Flow
//!
//! Consumers submit requests when a buffer runs low and withdraw them once
//! it refills.  A cart carrying a resource asks the matcher for the best
//! reachable request.  Producers consult the coordinator so two of them do
//! not fight over the same consumer.

pub mod board;
pub mod coordinator;
pub mod demand;
pub mod error;
pub mod matcher;
pub mod request;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use board::RequestBoard;
pub use coordinator::{SupplyCoordinator, SupplyRoute};
pub use demand::{DemandChange, DemandThresholds, DemandTracker};
pub use error::{LogisticsError, LogisticsResult};
pub use matcher::{best_request_for, MatchedRequest};
pub use request::{Priority, RequestKey, ResourceRequest};
