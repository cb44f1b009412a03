//! Headless operator prompter.
//!
//! Writes every prompt as a `PROMPT USER:` log line. Used when no interactive
//! front end is attached; the operator answers through the controller API.

use async_trait::async_trait;
use tracing::{error, info};
use udc_core::config::CommissionerSection;
use udc_core::ports::UserPrompterPort;
use udc_core::{CommissioningError, Passcode, ProductId, VendorId};

pub struct LoggingUserPrompter {
    displays_passcode_and_qr_code: bool,
}

impl LoggingUserPrompter {
    pub fn new(displays_passcode_and_qr_code: bool) -> Self {
        Self {
            displays_passcode_and_qr_code,
        }
    }

    pub fn from_config(config: &CommissionerSection) -> Self {
        Self::new(config.displays_passcode_and_qr_code)
    }
}

#[async_trait]
impl UserPrompterPort for LoggingUserPrompter {
    async fn prompt_for_commission_ok_permission(
        &self,
        vendor_id: VendorId,
        product_id: ProductId,
        device_name: &str,
        rotating_id_hex: &str,
    ) {
        info!(
            vendor_id,
            product_id,
            rotating_id = rotating_id_hex,
            "PROMPT USER: allow {device_name} to be commissioned?"
        );
    }

    async fn hide_prompts_on_cancel(
        &self,
        vendor_id: VendorId,
        product_id: ProductId,
        device_name: &str,
    ) {
        info!(
            vendor_id,
            product_id,
            "PROMPT USER: {device_name} cancelled, hiding prompts"
        );
    }

    async fn prompt_for_commission_passcode(
        &self,
        vendor_id: VendorId,
        product_id: ProductId,
        device_name: &str,
        pairing_hint: u16,
        pairing_instruction: &str,
    ) {
        info!(
            vendor_id,
            product_id,
            pairing_hint,
            pairing_instruction,
            "PROMPT USER: enter the passcode shown on {device_name}"
        );
    }

    async fn prompt_with_commissioner_passcode(
        &self,
        vendor_id: VendorId,
        product_id: ProductId,
        device_name: &str,
        passcode: Passcode,
        pairing_hint: u16,
        pairing_instruction: &str,
    ) {
        info!(
            vendor_id,
            product_id,
            pairing_hint,
            pairing_instruction,
            qr_code = self.displays_passcode_and_qr_code,
            "PROMPT USER: enter passcode {passcode:08} on {device_name}"
        );
    }

    async fn prompt_commissioning_started(
        &self,
        vendor_id: VendorId,
        product_id: ProductId,
        device_name: &str,
    ) {
        info!(
            vendor_id,
            product_id,
            "PROMPT USER: commissioning {device_name}..."
        );
    }

    async fn prompt_commissioning_succeeded(
        &self,
        vendor_id: VendorId,
        product_id: ProductId,
        device_name: Option<&str>,
    ) {
        let name = device_name.unwrap_or("device");
        info!(
            vendor_id,
            product_id,
            "PROMPT USER: {name} commissioned"
        );
    }

    async fn prompt_commissioning_failed(
        &self,
        device_name: Option<&str>,
        error: &CommissioningError,
    ) {
        let name = device_name.unwrap_or("device");
        error!(code = error.code, "PROMPT USER: commissioning {name} failed: {error}");
    }

    fn displays_passcode_and_qr_code(&self) -> bool {
        self.displays_passcode_and_qr_code
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qr_flag_follows_config() {
        let on = LoggingUserPrompter::from_config(&CommissionerSection {
            displays_passcode_and_qr_code: true,
        });
        let off = LoggingUserPrompter::from_config(&CommissionerSection::default());

        assert!(on.displays_passcode_and_qr_code());
        assert!(!off.displays_passcode_and_qr_code());
    }

    #[tokio::test]
    async fn test_prompts_do_not_require_a_subscriber() {
        let prompter = LoggingUserPrompter::new(false);

        prompter
            .prompt_for_commission_ok_permission(0xFFF1, 0x8001, "Phone", "0A1B")
            .await;
        prompter
            .prompt_commissioning_failed(None, &CommissioningError::new(3, "timeout"))
            .await;
    }
}
