//! # udc-core
//!
//! Core domain models and negotiation logic for the commissioner side of
//! user directed commissioning (UDC).
//!
//! This crate contains pure business logic without any infrastructure dependencies:
//! the peer session record, the declaration messages sent back to a commissionee,
//! the processing-state transition table and the ordered passcode-resolution rules.
//! Everything that talks to the outside world is expressed as a port in [`ports`].

// Public module exports
pub mod commissioning;
pub mod config;
pub mod declaration;
pub mod ids;
pub mod negotiation;
pub mod ports;
pub mod session;

// Re-export commonly used types at the crate root
pub use commissioning::{
    CommissionedPeer, CommissionedSession, CommissioningError, NodeId, Passcode, ProductId,
    VendorId, NO_PASSCODE,
};
pub use config::{CommissionerConfig, LoggingConfig};
pub use declaration::{CdError, CommissionerDeclaration};
pub use ids::{DeviceName, IdError, InstanceName, PairingInstruction, RotatingId};
pub use negotiation::{NegotiationAction, NegotiationError, NegotiationGate};
pub use session::{
    PeerSession, SessionFlags, SessionProcessingState, TargetAppCheckState, TargetAppInfo,
    TargetAppList, TransitionError,
};
