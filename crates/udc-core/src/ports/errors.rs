use thiserror::Error;

use crate::session::TransitionError;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("peer session not found")]
    NotFound,

    #[error("peer session table is full (capacity {capacity})")]
    StorageFull { capacity: usize },

    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),

    #[error("storage error: {0}")]
    Storage(String),
}
