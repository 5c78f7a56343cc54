//! Road-subsystem error types.

use thiserror::Error;

use rl_core::GridCoord;

/// Errors produced by `rl-roads`.
///
/// Unreachable cells are not errors; queries return `None` or an empty map.
#[derive(Debug, Error)]
pub enum RoadError {
    #[error("road tile parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type RoadResult<T> = Result<T, RoadError>;

/// A broken parent chain found while walking a BFS tree back to its root.
///
/// Reported through `tracing` by the pathfinder; callers only see `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PathDefect {
    #[error("parent cycle detected at {at}")]
    Cycle { at: GridCoord },

    #[error("cell {at} has no parent entry")]
    MissingParent { at: GridCoord },

    #[error("path exceeds {limit} cells")]
    TooLong { limit: usize },
}
