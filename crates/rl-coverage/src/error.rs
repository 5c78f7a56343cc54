use thiserror::Error;

use rl_core::CoreError;

#[derive(Debug, Error)]
pub enum CoverageError {
    #[error("emitter radius must be a non-negative number, got {0}")]
    InvalidRadius(f32),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type CoverageResult<T> = Result<T, CoverageError>;
