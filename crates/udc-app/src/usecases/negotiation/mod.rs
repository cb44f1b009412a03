//! Commissioner discovery negotiation
//!
//! ```text
//! Registry / Operator / Passcode service events
//!   ↓
//! CommissionerDiscoveryController (gate + session checks, under one lock)
//!   ↓
//! NegotiationAction list
//!   ↓
//! Ports (declarations, prompts, lookups, commissioning) after the lock is released
//! ```

mod actions;
mod controller;

pub use controller::CommissionerDiscoveryController;
