//! Port interfaces for the negotiation controller
//!
//! Every external collaborator of the controller is a port: the peer session
//! registry, the declaration transport, the operator-facing prompter, the
//! passcode service backed by content apps, the commissioning engine and the
//! post-commissioning listener. Implementations live in the infrastructure
//! layer or in the embedding application.
//!
//! Callback-style completions (`on_target_checked`, `resume_resolution`, ...)
//! may be delivered from inside a port call, so the controller never holds
//! its own lock while calling out.

mod clock;
mod commissioning;
pub mod errors;
mod passcode_service;
mod registry;
mod transport;
mod user_prompter;

pub use clock::ClockPort;
pub use commissioning::{CommissionerCallbackPort, PostCommissioningListenerPort};
pub use errors::RegistryError;
pub use passcode_service::PasscodeServicePort;
pub use registry::PeerSessionRegistryPort;
pub use transport::DeclarationTransportPort;
pub use user_prompter::UserPrompterPort;
