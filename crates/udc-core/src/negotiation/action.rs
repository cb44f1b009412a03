use std::net::SocketAddr;

use crate::commissioning::{
    CommissionedSession, CommissioningError, NodeId, Passcode, ProductId, VendorId,
};
use crate::declaration::CommissionerDeclaration;
use crate::session::TargetAppInfo;

/// Side effect requested by a negotiation step.
///
/// Actions are collected while the controller lock is held and executed in
/// order after it is released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NegotiationAction {
    SendDeclaration {
        declaration: CommissionerDeclaration,
        destination: SocketAddr,
    },

    PromptForConsent {
        vendor_id: VendorId,
        product_id: ProductId,
        device_name: String,
        rotating_id_hex: String,
    },

    HidePrompts {
        vendor_id: VendorId,
        product_id: ProductId,
        device_name: String,
    },

    PromptForPasscode {
        vendor_id: VendorId,
        product_id: ProductId,
        device_name: String,
        pairing_hint: u16,
        pairing_instruction: String,
    },

    DisplayCommissionerPasscode {
        vendor_id: VendorId,
        product_id: ProductId,
        device_name: String,
        passcode: Passcode,
        pairing_hint: u16,
        pairing_instruction: String,
    },

    LookupTargetApp {
        vendor_id: VendorId,
        product_id: ProductId,
        rotating_id_hex: String,
        target: TargetAppInfo,
    },

    FetchContentAppPasscode {
        vendor_id: VendorId,
        product_id: ProductId,
        rotating_id_hex: String,
    },

    NotifyCommissioningStarted {
        vendor_id: VendorId,
        product_id: ProductId,
        device_name: String,
    },

    StartCommissioning {
        passcode: Passcode,
        long_discriminator: u16,
        peer_address: SocketAddr,
    },

    NotifyPostCommissioning {
        vendor_id: VendorId,
        product_id: ProductId,
        node_id: NodeId,
        session: CommissionedSession,
    },

    NotifyCommissioningSucceeded {
        vendor_id: VendorId,
        product_id: ProductId,
        device_name: Option<String>,
    },

    NotifyCommissioningFailed {
        device_name: Option<String>,
        error: CommissioningError,
    },
}
