//! Commissioning handoff vocabulary shared by the controller and its ports.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 16-bit vendor identifier advertised by a commissionee or a content app.
pub type VendorId = u16;

/// 16-bit product identifier advertised by a commissionee or a content app.
pub type ProductId = u16;

/// Operational node id assigned once commissioning completes.
pub type NodeId = u64;

/// Setup passcode. Zero is never a valid passcode and means "none".
pub type Passcode = u32;

/// Sentinel for "no passcode available".
pub const NO_PASSCODE: Passcode = 0;

/// Opaque failure reported by the commissioning engine.
///
/// 由配网引擎上报的失败，核心层不解析其含义。
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("commissioning failed (code {code}): {message}")]
pub struct CommissioningError {
    pub code: u32,
    pub message: String,
}

impl CommissioningError {
    pub fn new(code: u32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Handle to the secure session established by a successful commissioning.
///
/// The controller never inspects it; it is forwarded to the post-commissioning listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionedSession {
    pub secure_session_id: u16,
    pub fabric_index: u8,
}

/// Identity of the last peer that completed commissioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionedPeer {
    pub vendor_id: VendorId,
    pub product_id: ProductId,
    pub node_id: NodeId,
}
