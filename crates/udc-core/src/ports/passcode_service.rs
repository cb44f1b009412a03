use async_trait::async_trait;

use crate::{
    commissioning::{Passcode, ProductId, VendorId},
    session::TargetAppInfo,
};

/// Passcode sources on the commissioner platform.
///
/// `lookup_target_content_app` completes through
/// `CommissionerDiscoveryController::on_target_checked`;
/// `fetch_commission_passcode_from_content_app` completes through
/// `CommissionerDiscoveryController::resume_resolution`. Either may complete
/// before returning.
#[async_trait]
pub trait PasscodeServicePort: Send + Sync {
    async fn lookup_target_content_app(
        &self,
        vendor_id: VendorId,
        product_id: ProductId,
        rotating_id_hex: &str,
        target: TargetAppInfo,
    ) -> anyhow::Result<()>;

    async fn fetch_commission_passcode_from_content_app(
        &self,
        vendor_id: VendorId,
        product_id: ProductId,
        rotating_id_hex: &str,
    ) -> anyhow::Result<()>;

    /// Generate a passcode for the operator to enter on the peer.
    /// Zero means the feature is disabled.
    ///
    /// Awaited while the controller holds its lock: implementations must
    /// return the value and must not call back into the controller.
    async fn get_commissioner_passcode(
        &self,
        vendor_id: VendorId,
        product_id: ProductId,
        rotating_id_hex: &str,
    ) -> anyhow::Result<Passcode>;
}
