use thiserror::Error;

use crate::ports::RegistryError;
use crate::session::SessionProcessingState;

/// Precondition violations of controller entry points.
///
/// Negotiation failures the peer must hear about are not errors; they are
/// reported with a declaration.
#[derive(Debug, Error)]
pub enum NegotiationError {
    #[error("controller is busy with instance {current}")]
    NotReady { current: String },

    #[error("no negotiation is waiting for consent")]
    NoPendingConsent,

    #[error("no active negotiation")]
    NoActiveSession,

    #[error("peer session registry is not configured")]
    RegistryNotConfigured,

    #[error("peer session {instance} not found")]
    SessionNotFound { instance: String },

    #[error("{operation} not allowed in state {state}")]
    InvalidState {
        operation: &'static str,
        state: SessionProcessingState,
    },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}
