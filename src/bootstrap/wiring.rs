//! # Dependency Injection / 依赖注入模块
//!
//! Assembles a [`CommissionerDiscoveryController`] from config and the
//! collaborator ports supplied by the embedding process.
//!
//! This is the only place that depends on udc-infra and udc-app together.
//! It assembles; it does not decide.
//! 只负责组装，不做决策。

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::debug;
use udc_app::{CommissionerDiscoveryController, NegotiationPorts};
use udc_core::ports::*;
use udc_core::{CommissionerConfig, InstanceName, NegotiationError, PeerSession};
use udc_infra::{InMemoryPeerSessionTable, SystemClock};

use crate::adapters::LoggingUserPrompter;

/// Collaborators supplied by the embedding process.
///
/// `prompter: None` falls back to [`LoggingUserPrompter`]; every other `None`
/// disables the matching feature.
#[derive(Clone, Default)]
pub struct ControllerDeps {
    pub transport: Option<Arc<dyn DeclarationTransportPort>>,
    pub prompter: Option<Arc<dyn UserPrompterPort>>,
    pub passcode_service: Option<Arc<dyn PasscodeServicePort>>,
    pub commissioner_callback: Option<Arc<dyn CommissionerCallbackPort>>,
    pub post_commissioning_listener: Option<Arc<dyn PostCommissioningListenerPort>>,
}

/// Controller plus the session table it reads from.
///
/// The discovery layer writes incoming requests into `sessions` and hands
/// them to the controller through [`CommissionerRuntime::receive_request`].
#[derive(Clone)]
pub struct CommissionerRuntime {
    pub controller: Arc<CommissionerDiscoveryController>,
    pub sessions: Arc<InMemoryPeerSessionTable>,
}

impl CommissionerRuntime {
    /// Store the latest view of a commissionee and submit it for negotiation.
    ///
    /// Dropped without touching the session table while a negotiation runs.
    pub async fn receive_request(&self, request: PeerSession) -> Result<(), NegotiationError> {
        self.controller.receive_request(request).await
    }

    /// Record seen on the wire before its details are known.
    pub async fn observe_peer(
        &self,
        instance: &InstanceName,
        peer_address: SocketAddr,
    ) -> Result<PeerSession, RegistryError> {
        self.sessions.find_or_create(instance, peer_address).await
    }
}

/// Build the controller and its session table.
pub fn build_controller(config: &CommissionerConfig, deps: ControllerDeps) -> CommissionerRuntime {
    let sessions = Arc::new(InMemoryPeerSessionTable::from_config(
        &config.registry,
        Arc::new(SystemClock),
    ));
    let prompter = deps.prompter.unwrap_or_else(|| {
        debug!("no prompter supplied, prompting through the log");
        Arc::new(LoggingUserPrompter::from_config(&config.commissioner)) as Arc<dyn UserPrompterPort>
    });

    let ports = NegotiationPorts {
        registry: Some(sessions.clone()),
        transport: deps.transport,
        prompter: Some(prompter),
        passcode_service: deps.passcode_service,
        commissioner_callback: deps.commissioner_callback,
        post_commissioning_listener: deps.post_commissioning_listener,
    };

    CommissionerRuntime {
        controller: Arc::new(CommissionerDiscoveryController::new(ports)),
        sessions,
    }
}
