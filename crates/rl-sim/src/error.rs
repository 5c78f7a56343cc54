use rl_core::{CoreError, StructureId};
use rl_coverage::CoverageError;
use rl_logistics::LogisticsError;
use rl_mobility::MobilityError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("engine configuration error: {0}")]
    Config(String),

    #[error("snapshot of {id} has version {found}, expected {expected}")]
    SnapshotVersion {
        id:       StructureId,
        found:    u32,
        expected: u32,
    },

    #[error("group move has no placement for {0}")]
    MissingPlacement(StructureId),

    #[error("{0} is not part of this group move")]
    NotInGroup(StructureId),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Logistics(#[from] LogisticsError),

    #[error(transparent)]
    Coverage(#[from] CoverageError),

    #[error("mobility error: {0}")]
    Mobility(#[from] MobilityError),
}

pub type SimResult<T> = Result<T, SimError>;
