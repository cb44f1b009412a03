//! Negotiation gate, decision rules and side-effect vocabulary.
//!
//! The controller in `udc-app` holds a [`NegotiationGate`] behind its lock,
//! applies the pure rules in [`decision`] and turns the outcome into a list of
//! [`NegotiationAction`]s that are executed once the lock is released.

mod action;
pub mod decision;
mod error;
mod gate;

pub use action::NegotiationAction;
pub use decision::{apply_target_check, plan_resume, ResumeStep, TargetCheckDecision};
pub use error::NegotiationError;
pub use gate::NegotiationGate;
