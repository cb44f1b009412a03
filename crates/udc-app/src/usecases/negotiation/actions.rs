//! Executes negotiation actions against the configured ports.
//!
//! Runs without the controller lock held. Port failures are logged and the
//! remaining actions still run; nothing is rolled back.

use tracing::{debug, warn};
use udc_core::NegotiationAction;

use super::CommissionerDiscoveryController;

impl CommissionerDiscoveryController {
    pub(super) async fn execute_actions(&self, actions: Vec<NegotiationAction>) {
        for action in actions {
            self.execute_action(action).await;
        }
    }

    async fn execute_action(&self, action: NegotiationAction) {
        let ports = &self.ports;
        match action {
            NegotiationAction::SendDeclaration {
                declaration,
                destination,
            } => match &ports.transport {
                Some(transport) => {
                    debug!(%declaration, %destination, "sending commissioner declaration");
                    log_port_failure(
                        "send_declaration",
                        transport.send_declaration(declaration, destination).await,
                    );
                }
                None => warn!(%declaration, "no declaration transport configured"),
            },

            NegotiationAction::PromptForConsent {
                vendor_id,
                product_id,
                device_name,
                rotating_id_hex,
            } => {
                if let Some(prompter) = &ports.prompter {
                    prompter
                        .prompt_for_commission_ok_permission(
                            vendor_id,
                            product_id,
                            &device_name,
                            &rotating_id_hex,
                        )
                        .await;
                }
            }

            NegotiationAction::HidePrompts {
                vendor_id,
                product_id,
                device_name,
            } => {
                if let Some(prompter) = &ports.prompter {
                    prompter
                        .hide_prompts_on_cancel(vendor_id, product_id, &device_name)
                        .await;
                }
            }

            NegotiationAction::PromptForPasscode {
                vendor_id,
                product_id,
                device_name,
                pairing_hint,
                pairing_instruction,
            } => {
                if let Some(prompter) = &ports.prompter {
                    prompter
                        .prompt_for_commission_passcode(
                            vendor_id,
                            product_id,
                            &device_name,
                            pairing_hint,
                            &pairing_instruction,
                        )
                        .await;
                }
            }

            NegotiationAction::DisplayCommissionerPasscode {
                vendor_id,
                product_id,
                device_name,
                passcode,
                pairing_hint,
                pairing_instruction,
            } => {
                if let Some(prompter) = &ports.prompter {
                    prompter
                        .prompt_with_commissioner_passcode(
                            vendor_id,
                            product_id,
                            &device_name,
                            passcode,
                            pairing_hint,
                            &pairing_instruction,
                        )
                        .await;
                }
            }

            NegotiationAction::LookupTargetApp {
                vendor_id,
                product_id,
                rotating_id_hex,
                target,
            } => {
                if let Some(service) = &ports.passcode_service {
                    log_port_failure(
                        "lookup_target_content_app",
                        service
                            .lookup_target_content_app(
                                vendor_id,
                                product_id,
                                &rotating_id_hex,
                                target,
                            )
                            .await,
                    );
                }
            }

            NegotiationAction::FetchContentAppPasscode {
                vendor_id,
                product_id,
                rotating_id_hex,
            } => {
                if let Some(service) = &ports.passcode_service {
                    log_port_failure(
                        "fetch_commission_passcode_from_content_app",
                        service
                            .fetch_commission_passcode_from_content_app(
                                vendor_id,
                                product_id,
                                &rotating_id_hex,
                            )
                            .await,
                    );
                }
            }

            NegotiationAction::NotifyCommissioningStarted {
                vendor_id,
                product_id,
                device_name,
            } => {
                if let Some(prompter) = &ports.prompter {
                    prompter
                        .prompt_commissioning_started(vendor_id, product_id, &device_name)
                        .await;
                }
            }

            NegotiationAction::StartCommissioning {
                passcode,
                long_discriminator,
                peer_address,
            } => {
                if let Some(callback) = &ports.commissioner_callback {
                    log_port_failure(
                        "ready_for_commissioning",
                        callback
                            .ready_for_commissioning(passcode, long_discriminator, peer_address)
                            .await,
                    );
                }
            }

            NegotiationAction::NotifyPostCommissioning {
                vendor_id,
                product_id,
                node_id,
                session,
            } => {
                if let Some(listener) = &ports.post_commissioning_listener {
                    log_port_failure(
                        "commissioning_completed",
                        listener
                            .commissioning_completed(vendor_id, product_id, node_id, session)
                            .await,
                    );
                }
            }

            NegotiationAction::NotifyCommissioningSucceeded {
                vendor_id,
                product_id,
                device_name,
            } => {
                if let Some(prompter) = &ports.prompter {
                    prompter
                        .prompt_commissioning_succeeded(
                            vendor_id,
                            product_id,
                            device_name.as_deref(),
                        )
                        .await;
                }
            }

            NegotiationAction::NotifyCommissioningFailed { device_name, error } => {
                if let Some(prompter) = &ports.prompter {
                    prompter
                        .prompt_commissioning_failed(device_name.as_deref(), &error)
                        .await;
                }
            }
        }
    }
}

fn log_port_failure(port_call: &'static str, result: anyhow::Result<()>) {
    if let Err(err) = result {
        warn!(port_call, error = %err, "port call failed");
    }
}
