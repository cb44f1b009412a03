//! UDC Commissioner Application Orchestration Layer
//!
//! This crate contains the negotiation controller that drives a commissionee
//! from consent through passcode resolution to the commissioning handoff.

pub mod deps;
pub mod usecases;

pub use deps::NegotiationPorts;
pub use usecases::negotiation::CommissionerDiscoveryController;
