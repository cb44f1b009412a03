use async_trait::async_trait;
use std::net::SocketAddr;

use crate::commissioning::{CommissionedSession, NodeId, Passcode, ProductId, VendorId};

/// Commissioning engine entry point.
///
/// Completion is reported later through the controller's
/// `on_commissioning_succeeded` / `on_commissioning_failed`.
#[async_trait]
pub trait CommissionerCallbackPort: Send + Sync {
    async fn ready_for_commissioning(
        &self,
        passcode: Passcode,
        long_discriminator: u16,
        peer_address: SocketAddr,
    ) -> anyhow::Result<()>;
}

/// Optional follow-up work once commissioning succeeded.
///
/// The listener must eventually call `on_post_commissioning_succeeded` or
/// `on_post_commissioning_failed`.
#[async_trait]
pub trait PostCommissioningListenerPort: Send + Sync {
    async fn commissioning_completed(
        &self,
        vendor_id: VendorId,
        product_id: ProductId,
        node_id: NodeId,
        session: CommissionedSession,
    ) -> anyhow::Result<()>;
}
