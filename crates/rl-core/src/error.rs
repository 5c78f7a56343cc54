//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`.  Nothing here covers "no path" outcomes; those are
//! ordinary `None` results.

use thiserror::Error;

use crate::StructureId;

/// The base error type for `rl-core` and a common variant for sub-crates.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("structure {0} not found")]
    StructureNotFound(StructureId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("{0} handle space exhausted")]
    HandlesExhausted(&'static str),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `rl-core`.
pub type CoreResult<T> = Result<T, CoreError>;
