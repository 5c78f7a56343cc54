//! Logistics error type.

use thiserror::Error;

use rl_core::CoreError;

/// Errors produced by `rl-logistics`.
///
/// An unmatched request or an unreachable consumer is never an error.
#[derive(Debug, Error)]
pub enum LogisticsError {
    #[error("priority {0} outside 1..=5")]
    InvalidPriority(u8),

    #[error("request threshold {request_at} must be below fulfil threshold {fulfill_at}")]
    InvalidThresholds { request_at: f32, fulfill_at: f32 },

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type LogisticsResult<T> = Result<T, LogisticsError>;
