use rl_core::{AgentId, CoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MobilityError {
    #[error("cart {0} is already in transit")]
    AlreadyInTransit(AgentId),

    #[error("cart {0} does not exist")]
    UnknownCart(AgentId),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type MobilityResult<T> = Result<T, MobilityError>;
