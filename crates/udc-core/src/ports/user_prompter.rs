use async_trait::async_trait;

use crate::commissioning::{CommissioningError, Passcode, ProductId, VendorId};

/// Operator-facing prompts.
///
/// Prompts are fire-and-forget; the operator's answer comes back through the
/// controller's consent and passcode entry points.
#[async_trait]
pub trait UserPrompterPort: Send + Sync {
    /// Ask the operator whether `device_name` may be commissioned.
    async fn prompt_for_commission_ok_permission(
        &self,
        vendor_id: VendorId,
        product_id: ProductId,
        device_name: &str,
        rotating_id_hex: &str,
    );

    /// Retract any prompt shown for a peer that cancelled.
    async fn hide_prompts_on_cancel(
        &self,
        vendor_id: VendorId,
        product_id: ProductId,
        device_name: &str,
    );

    /// Ask the operator to type in the passcode shown on the peer.
    async fn prompt_for_commission_passcode(
        &self,
        vendor_id: VendorId,
        product_id: ProductId,
        device_name: &str,
        pairing_hint: u16,
        pairing_instruction: &str,
    );

    /// Show a commissioner-generated passcode for the operator to enter on the peer.
    async fn prompt_with_commissioner_passcode(
        &self,
        vendor_id: VendorId,
        product_id: ProductId,
        device_name: &str,
        passcode: Passcode,
        pairing_hint: u16,
        pairing_instruction: &str,
    );

    async fn prompt_commissioning_started(
        &self,
        vendor_id: VendorId,
        product_id: ProductId,
        device_name: &str,
    );

    async fn prompt_commissioning_succeeded(
        &self,
        vendor_id: VendorId,
        product_id: ProductId,
        device_name: Option<&str>,
    );

    async fn prompt_commissioning_failed(
        &self,
        device_name: Option<&str>,
        error: &CommissioningError,
    );

    /// Whether the passcode view also renders a QR code.
    fn displays_passcode_and_qr_code(&self) -> bool;
}
