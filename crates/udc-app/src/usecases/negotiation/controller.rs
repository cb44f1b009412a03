//! Commissioner discovery controller
//!
//! 负责单个 UDC 协商的全过程：征求用户同意、解析配对码、移交配网引擎。
//!
//! Every entry point takes the controller lock, validates its preconditions
//! against the gate and the active peer session, and collects the side
//! effects it needs as [`NegotiationAction`]s. The actions run after the lock
//! is released, so a port may call back into the controller from inside a
//! port call.

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, info_span, warn, Instrument};

use udc_core::{
    negotiation::{apply_target_check, plan_resume, ResumeStep, TargetCheckDecision},
    ports::PeerSessionRegistryPort,
    CommissionedPeer, CommissionedSession, CommissionerDeclaration, CommissioningError,
    NegotiationAction, NegotiationError, NegotiationGate, NodeId, Passcode, PeerSession,
    ProductId, SessionProcessingState, TargetAppInfo, VendorId, NO_PASSCODE,
};

use crate::deps::NegotiationPorts;

type Actions = Vec<NegotiationAction>;

/// Single-flight negotiation controller for the commissioner role.
pub struct CommissionerDiscoveryController {
    gate: Mutex<NegotiationGate>,
    pub(super) ports: NegotiationPorts,
}

impl CommissionerDiscoveryController {
    pub fn new(ports: NegotiationPorts) -> Self {
        Self {
            gate: Mutex::new(NegotiationGate::idle()),
            ports,
        }
    }

    /// Intake of a commissionee request observed by the registry.
    ///
    /// Only accepted while idle. A cancel retracts prompts, a
    /// commissioner-passcode-ready signal hands off with the cached passcode,
    /// anything else starts a new negotiation by asking for consent.
    pub async fn submit_request(&self, request: &PeerSession) -> Result<(), NegotiationError> {
        let span = info_span!(
            "udc.submit_request",
            instance = %request.instance(),
            vendor_id = request.vendor_id(),
            product_id = request.product_id(),
        );
        async {
            let mut actions = Actions::new();
            let outcome = {
                let mut gate = self.gate.lock().await;
                self.submit_request_locked(&mut gate, request, &mut actions)
                    .await
            };
            self.finish("submit_request", outcome, actions).await
        }
        .instrument(span)
        .await
    }

    /// Intake straight from the discovery layer.
    ///
    /// Stores the request in the registry and submits it under one lock. A
    /// busy controller drops the request without touching the registry.
    pub async fn receive_request(&self, request: PeerSession) -> Result<(), NegotiationError> {
        let span = info_span!(
            "udc.receive_request",
            instance = %request.instance(),
            vendor_id = request.vendor_id(),
            product_id = request.product_id(),
        );
        async {
            let mut actions = Actions::new();
            let outcome = {
                let mut gate = self.gate.lock().await;
                self.receive_request_locked(&mut gate, request, &mut actions)
                    .await
            };
            self.finish("receive_request", outcome, actions).await
        }
        .instrument(span)
        .await
    }

    /// Operator approved the consent prompt.
    pub async fn confirm_consent(&self) -> Result<(), NegotiationError> {
        async {
            let mut actions = Actions::new();
            let outcome = {
                let mut gate = self.gate.lock().await;
                self.confirm_consent_locked(&mut gate, &mut actions).await
            };
            self.finish("confirm_consent", outcome, actions).await
        }
        .instrument(info_span!("udc.confirm_consent"))
        .await
    }

    /// Operator declined the consent prompt.
    ///
    /// The gate stays busy; the supervisor calls [`Self::reset`] afterwards.
    pub async fn decline_consent(&self) -> Result<(), NegotiationError> {
        async {
            let outcome = {
                let mut gate = self.gate.lock().await;
                self.decline_consent_locked(&mut gate).await
            };
            self.finish("decline_consent", outcome, Actions::new())
                .await
        }
        .instrument(info_span!("udc.decline_consent"))
        .await
    }

    /// Completion of one target content app lookup.
    pub async fn on_target_checked(
        &self,
        target: TargetAppInfo,
        passcode: Passcode,
    ) -> Result<(), NegotiationError> {
        let span = info_span!(
            "udc.on_target_checked",
            vendor_id = target.vendor_id,
            product_id = target.product_id,
            check_state = ?target.check_state,
        );
        async {
            let mut actions = Actions::new();
            let outcome = {
                let mut gate = self.gate.lock().await;
                self.on_target_checked_locked(&mut gate, target, passcode, &mut actions)
                    .await
            };
            self.finish("on_target_checked", outcome, actions).await
        }
        .instrument(span)
        .await
    }

    /// Generic passcode fallback; also the completion of a content app fetch.
    pub async fn resume_resolution(&self, passcode: Passcode) -> Result<(), NegotiationError> {
        async {
            let mut actions = Actions::new();
            let outcome = {
                let mut gate = self.gate.lock().await;
                self.resume_resolution_locked(&mut gate, passcode, &mut actions)
                    .await
            };
            self.finish("resume_resolution", outcome, actions).await
        }
        .instrument(info_span!("udc.resume_resolution"))
        .await
    }

    /// Hand the active session to the commissioning engine with `passcode`,
    /// typically one the operator typed in.
    pub async fn proceed_with_passcode(&self, passcode: Passcode) -> Result<(), NegotiationError> {
        async {
            let mut actions = Actions::new();
            let outcome = {
                let mut gate = self.gate.lock().await;
                self.proceed_with_passcode_locked(&mut gate, passcode, &mut actions)
                    .await
            };
            self.finish("proceed_with_passcode", outcome, actions).await
        }
        .instrument(info_span!("udc.proceed_with_passcode"))
        .await
    }

    pub async fn on_commissioning_succeeded(
        &self,
        vendor_id: VendorId,
        product_id: ProductId,
        node_id: NodeId,
        session: CommissionedSession,
    ) -> Result<(), NegotiationError> {
        let span = info_span!(
            "udc.on_commissioning_succeeded",
            vendor_id,
            product_id,
            node_id,
        );
        async {
            let mut actions = Actions::new();
            {
                let mut gate = self.gate.lock().await;
                gate.record_commissioned(CommissionedPeer {
                    vendor_id,
                    product_id,
                    node_id,
                });

                if self.ports.post_commissioning_listener.is_some() {
                    debug!("handing over to post-commissioning listener");
                    actions.push(NegotiationAction::NotifyPostCommissioning {
                        vendor_id,
                        product_id,
                        node_id,
                        session,
                    });
                } else {
                    self.finish_success_locked(&mut gate, &mut actions).await;
                }
            }
            self.finish("on_commissioning_succeeded", Ok(()), actions)
                .await
        }
        .instrument(span)
        .await
    }

    pub async fn on_commissioning_failed(
        &self,
        error: CommissioningError,
    ) -> Result<(), NegotiationError> {
        let span = info_span!("udc.on_commissioning_failed", code = error.code);
        async {
            let mut actions = Actions::new();
            {
                let mut gate = self.gate.lock().await;
                self.finish_failure_locked(&mut gate, error, &mut actions)
                    .await;
            }
            self.finish("on_commissioning_failed", Ok(()), actions)
                .await
        }
        .instrument(span)
        .await
    }

    pub async fn on_post_commissioning_succeeded(&self) -> Result<(), NegotiationError> {
        async {
            let mut actions = Actions::new();
            {
                let mut gate = self.gate.lock().await;
                self.finish_success_locked(&mut gate, &mut actions).await;
            }
            self.finish("on_post_commissioning_succeeded", Ok(()), actions)
                .await
        }
        .instrument(info_span!("udc.on_post_commissioning_succeeded"))
        .await
    }

    pub async fn on_post_commissioning_failed(
        &self,
        error: CommissioningError,
    ) -> Result<(), NegotiationError> {
        let span = info_span!("udc.on_post_commissioning_failed", code = error.code);
        async {
            let mut actions = Actions::new();
            {
                let mut gate = self.gate.lock().await;
                self.finish_failure_locked(&mut gate, error, &mut actions)
                    .await;
            }
            self.finish("on_post_commissioning_failed", Ok(()), actions)
                .await
        }
        .instrument(span)
        .await
    }

    /// Back to idle. Required after a decline.
    pub async fn reset(&self) {
        let mut gate = self.gate.lock().await;
        if let Some(instance) = gate.current_instance() {
            info!(instance = %instance, "controller reset");
        }
        gate.reset();
    }

    /// Device name of the active session.
    pub async fn commissionee_name(&self) -> Option<String> {
        let gate = self.gate.lock().await;
        self.commissionee_name_locked(&gate).await
    }

    pub async fn active_session(&self) -> Option<PeerSession> {
        let gate = self.gate.lock().await;
        self.resolve_active(&gate).await.ok().map(|(_, session)| session)
    }

    pub async fn gate(&self) -> NegotiationGate {
        self.gate.lock().await.clone()
    }

    /// Logs a rejection, or runs the collected actions once the lock is gone.
    async fn finish(
        &self,
        operation: &'static str,
        outcome: Result<(), NegotiationError>,
        actions: Actions,
    ) -> Result<(), NegotiationError> {
        if let Err(err) = &outcome {
            warn!(operation, error = %err, "request rejected");
            return outcome;
        }
        self.execute_actions(actions).await;
        Ok(())
    }

    // ===== Locked steps =====

    async fn receive_request_locked(
        &self,
        gate: &mut NegotiationGate,
        request: PeerSession,
        actions: &mut Actions,
    ) -> Result<(), NegotiationError> {
        ensure_ready(gate)?;
        let registry = self
            .ports
            .registry
            .clone()
            .ok_or(NegotiationError::RegistryNotConfigured)?;
        let instance = request.instance().clone();
        registry.record_request(request).await?;
        let stored = registry
            .find_by_instance(&instance)
            .await?
            .ok_or_else(|| NegotiationError::SessionNotFound {
                instance: instance.to_string(),
            })?;
        self.submit_request_locked(gate, &stored, actions).await
    }

    async fn submit_request_locked(
        &self,
        gate: &mut NegotiationGate,
        request: &PeerSession,
        actions: &mut Actions,
    ) -> Result<(), NegotiationError> {
        ensure_ready(gate)?;

        let flags = request.flags();
        if flags.cancel_passcode {
            info!("commissionee cancelled its request");
            actions.push(NegotiationAction::HidePrompts {
                vendor_id: request.vendor_id(),
                product_id: request.product_id(),
                device_name: request.device_name().to_string(),
            });
            return Ok(());
        }

        if flags.commissioner_passcode_ready && request.accepts_declarations() {
            let passcode = request.cached_commissioner_passcode();
            if passcode == NO_PASSCODE {
                error!("commissioner passcode ready but none cached");
                self.push_declaration(
                    request,
                    CommissionerDeclaration::unexpected_commissioner_passcode_ready(),
                    actions,
                );
                return Ok(());
            }

            info!("commissioner passcode ready, commissioning with cached passcode");
            let previous = gate.clone();
            gate.begin(request.instance().clone());
            let outcome = self
                .proceed_with_passcode_locked(gate, passcode, actions)
                .await;
            if outcome.is_err() {
                *gate = previous;
            }
            return outcome;
        }

        gate.begin(request.instance().clone());
        info!("requesting operator consent");
        actions.push(NegotiationAction::PromptForConsent {
            vendor_id: request.vendor_id(),
            product_id: request.product_id(),
            device_name: request.device_name().to_string(),
            rotating_id_hex: request.rotating_id_hex(),
        });
        Ok(())
    }

    async fn confirm_consent_locked(
        &self,
        gate: &mut NegotiationGate,
        actions: &mut Actions,
    ) -> Result<(), NegotiationError> {
        if !gate.is_pending_consent() {
            return Err(NegotiationError::NoPendingConsent);
        }
        let (registry, session) = self.resolve_active(gate).await?;
        require_state(
            "confirm_consent",
            &session,
            SessionProcessingState::accepts_consent,
        )?;
        registry
            .set_processing_state(session.instance(), SessionProcessingState::ResolvingPasscode)
            .await?;

        if self.ports.passcode_service.is_none() {
            debug!("no passcode service, skipping content app lookup");
            return self
                .resume_resolution_locked(gate, NO_PASSCODE, actions)
                .await;
        }

        let rotating_id_hex = session.rotating_id_hex();
        if !session.target_apps().is_empty() {
            debug!(
                targets = session.target_apps().len(),
                "looking up target content apps"
            );
            for target in session.target_apps() {
                actions.push(NegotiationAction::LookupTargetApp {
                    vendor_id: session.vendor_id(),
                    product_id: session.product_id(),
                    rotating_id_hex: rotating_id_hex.clone(),
                    target: *target,
                });
            }
            return Ok(());
        }

        debug!("fetching passcode from content app");
        actions.push(NegotiationAction::FetchContentAppPasscode {
            vendor_id: session.vendor_id(),
            product_id: session.product_id(),
            rotating_id_hex,
        });
        Ok(())
    }

    async fn decline_consent_locked(
        &self,
        gate: &mut NegotiationGate,
    ) -> Result<(), NegotiationError> {
        if !gate.is_pending_consent() {
            return Err(NegotiationError::NoPendingConsent);
        }
        let (registry, session) = self.resolve_active(gate).await?;
        require_state(
            "decline_consent",
            &session,
            SessionProcessingState::accepts_consent,
        )?;
        registry
            .set_processing_state(session.instance(), SessionProcessingState::Declined)
            .await?;
        gate.decline();
        info!("operator declined commissioning");
        Ok(())
    }

    async fn on_target_checked_locked(
        &self,
        gate: &mut NegotiationGate,
        target: TargetAppInfo,
        passcode: Passcode,
        actions: &mut Actions,
    ) -> Result<(), NegotiationError> {
        let (registry, session) = self.resolve_active(gate).await?;
        require_state(
            "on_target_checked",
            &session,
            SessionProcessingState::accepts_passcode_results,
        )?;

        let mut apps = session.target_apps().clone();
        let decision = apply_target_check(&mut apps, &target, passcode);
        if &apps != session.target_apps() {
            registry
                .update_target_apps(session.instance(), apps)
                .await?;
        }

        match decision {
            TargetCheckDecision::AlreadyResolved => {
                debug!("passcode already returned by another target app");
                Ok(())
            }
            TargetCheckDecision::Commission { passcode } => {
                info!("target app returned a passcode");
                self.proceed_with_passcode_locked(gate, passcode, actions)
                    .await
            }
            TargetCheckDecision::AwaitPending => {
                debug!("waiting for remaining target apps");
                Ok(())
            }
            TargetCheckDecision::Advance { apps_found } => {
                if !apps_found {
                    warn!("target apps specified but none found");
                    self.push_declaration(
                        &session,
                        CommissionerDeclaration::no_apps_found(),
                        actions,
                    );
                }
                self.resume_resolution_locked(gate, NO_PASSCODE, actions)
                    .await
            }
        }
    }

    async fn resume_resolution_locked(
        &self,
        gate: &mut NegotiationGate,
        passcode: Passcode,
        actions: &mut Actions,
    ) -> Result<(), NegotiationError> {
        let (registry, session) = self.resolve_active(gate).await?;
        require_state(
            "resume_resolution",
            &session,
            SessionProcessingState::accepts_passcode_results,
        )?;

        match plan_resume(&session, passcode, self.ports.passcode_service.is_some()) {
            ResumeStep::Commission { passcode } => {
                self.proceed_with_passcode_locked(gate, passcode, actions)
                    .await
            }
            ResumeStep::GenerateCommissionerPasscode => {
                self.generate_commissioner_passcode(registry.as_ref(), &session, actions)
                    .await
            }
            ResumeStep::PromptForPasscode { declaration } => {
                if let Some(declaration) = declaration {
                    debug!(%declaration, "telling commissionee a passcode is needed");
                    self.push_declaration(&session, declaration, actions);
                }
                actions.push(NegotiationAction::PromptForPasscode {
                    vendor_id: session.vendor_id(),
                    product_id: session.product_id(),
                    device_name: session.device_name().to_string(),
                    pairing_hint: session.pairing_hint(),
                    pairing_instruction: session.pairing_instruction().to_string(),
                });
                Ok(())
            }
        }
    }

    async fn generate_commissioner_passcode(
        &self,
        registry: &dyn PeerSessionRegistryPort,
        session: &PeerSession,
        actions: &mut Actions,
    ) -> Result<(), NegotiationError> {
        let passcode = match &self.ports.passcode_service {
            Some(service) => service
                .get_commissioner_passcode(
                    session.vendor_id(),
                    session.product_id(),
                    &session.rotating_id_hex(),
                )
                .await
                .unwrap_or_else(|err| {
                    warn!(error = %err, "commissioner passcode generation failed");
                    NO_PASSCODE
                }),
            None => NO_PASSCODE,
        };

        if passcode == NO_PASSCODE {
            error!("commissioner passcode disabled");
            self.push_declaration(
                session,
                CommissionerDeclaration::commissioner_passcode_disabled(),
                actions,
            );
            return Ok(());
        }

        registry
            .set_cached_commissioner_passcode(session.instance(), passcode)
            .await?;
        let qr_code_displayed = self
            .ports
            .prompter
            .as_ref()
            .is_some_and(|p| p.displays_passcode_and_qr_code());
        info!(qr_code_displayed, "commissioner passcode generated");
        self.push_declaration(
            session,
            CommissionerDeclaration::commissioner_passcode_in_use(qr_code_displayed),
            actions,
        );
        actions.push(NegotiationAction::DisplayCommissionerPasscode {
            vendor_id: session.vendor_id(),
            product_id: session.product_id(),
            device_name: session.device_name().to_string(),
            passcode,
            pairing_hint: session.pairing_hint(),
            pairing_instruction: session.pairing_instruction().to_string(),
        });
        Ok(())
    }

    async fn proceed_with_passcode_locked(
        &self,
        gate: &mut NegotiationGate,
        passcode: Passcode,
        actions: &mut Actions,
    ) -> Result<(), NegotiationError> {
        if !gate.is_pending_consent() {
            return Err(NegotiationError::NoPendingConsent);
        }
        let (registry, session) = self.resolve_active(gate).await?;
        require_state(
            "proceed_with_passcode",
            &session,
            SessionProcessingState::accepts_handoff,
        )?;

        let peer_address = session.peer_address();
        registry
            .set_processing_state(session.instance(), SessionProcessingState::Commissioning)
            .await?;

        if self.ports.commissioner_callback.is_none() {
            warn!("no commissioner callback configured, commissioning not started");
            return Ok(());
        }
        info!(%peer_address, "handing off to commissioning");
        actions.push(NegotiationAction::NotifyCommissioningStarted {
            vendor_id: session.vendor_id(),
            product_id: session.product_id(),
            device_name: session.device_name().to_string(),
        });
        actions.push(NegotiationAction::StartCommissioning {
            passcode,
            long_discriminator: session.long_discriminator(),
            peer_address,
        });
        Ok(())
    }

    async fn finish_success_locked(&self, gate: &mut NegotiationGate, actions: &mut Actions) {
        let (vendor_id, product_id) = gate
            .last_commissioned()
            .map(|peer| (peer.vendor_id, peer.product_id))
            .unwrap_or_default();
        self.mark_active_session(gate, SessionProcessingState::Succeeded)
            .await;
        let device_name = self.commissionee_name_locked(gate).await;
        info!("commissioning succeeded");
        actions.push(NegotiationAction::NotifyCommissioningSucceeded {
            vendor_id,
            product_id,
            device_name,
        });
        gate.reset();
    }

    async fn finish_failure_locked(
        &self,
        gate: &mut NegotiationGate,
        error: CommissioningError,
        actions: &mut Actions,
    ) {
        self.mark_active_session(gate, SessionProcessingState::Failed)
            .await;
        let device_name = self.commissionee_name_locked(gate).await;
        error!(error = %error, "commissioning failed");
        actions.push(NegotiationAction::NotifyCommissioningFailed { device_name, error });
        gate.reset();
    }

    // ===== Helpers =====

    /// Registry plus the live record of the active instance.
    async fn resolve_active(
        &self,
        gate: &NegotiationGate,
    ) -> Result<(Arc<dyn PeerSessionRegistryPort>, PeerSession), NegotiationError> {
        let registry = self
            .ports
            .registry
            .clone()
            .ok_or(NegotiationError::RegistryNotConfigured)?;
        let instance = gate
            .active_instance()
            .ok_or(NegotiationError::NoActiveSession)?;
        let session = registry
            .find_by_instance(instance)
            .await?
            .ok_or_else(|| NegotiationError::SessionNotFound {
                instance: instance.to_string(),
            })?;
        Ok((registry, session))
    }

    async fn commissionee_name_locked(&self, gate: &NegotiationGate) -> Option<String> {
        match self.resolve_active(gate).await {
            Ok((_, session)) => Some(session.device_name().to_string()),
            Err(err) => {
                debug!(error = %err, "no current commissionee");
                None
            }
        }
    }

    /// Best effort: completion is reported even when the record is gone.
    async fn mark_active_session(&self, gate: &NegotiationGate, state: SessionProcessingState) {
        let Ok((registry, session)) = self.resolve_active(gate).await else {
            return;
        };
        if let Err(err) = registry
            .set_processing_state(session.instance(), state)
            .await
        {
            warn!(error = %err, %state, "could not record commissioning outcome");
        }
    }

    fn push_declaration(
        &self,
        session: &PeerSession,
        declaration: CommissionerDeclaration,
        actions: &mut Actions,
    ) {
        match session.declaration_destination() {
            Some(destination) => actions.push(NegotiationAction::SendDeclaration {
                declaration,
                destination,
            }),
            None => debug!(%declaration, "commissionee takes no declarations"),
        }
    }
}

fn ensure_ready(gate: &NegotiationGate) -> Result<(), NegotiationError> {
    if gate.is_ready() {
        return Ok(());
    }
    Err(NegotiationError::NotReady {
        current: gate
            .current_instance()
            .map(ToString::to_string)
            .unwrap_or_default(),
    })
}

fn require_state(
    operation: &'static str,
    session: &PeerSession,
    allowed: fn(SessionProcessingState) -> bool,
) -> Result<(), NegotiationError> {
    let state = session.processing_state();
    if allowed(state) {
        Ok(())
    } else {
        Err(NegotiationError::InvalidState { operation, state })
    }
}
