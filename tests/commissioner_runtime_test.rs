//! Runtime wiring tests
//! 装配层集成测试

use std::io::Write;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::NamedTempFile;
use udc_commissioner_lib::{build_controller, load_config, ControllerDeps};
use udc_core::ports::{CommissionerCallbackPort, DeclarationTransportPort, RegistryError};
use udc_core::{
    CommissionerDeclaration, InstanceName, NegotiationError, Passcode, PeerSession,
    SessionFlags, SessionProcessingState,
};

#[derive(Default)]
struct RecordingCommissioner {
    calls: Mutex<Vec<(Passcode, u16, SocketAddr)>>,
}

#[async_trait]
impl CommissionerCallbackPort for RecordingCommissioner {
    async fn ready_for_commissioning(
        &self,
        passcode: Passcode,
        long_discriminator: u16,
        peer_address: SocketAddr,
    ) -> anyhow::Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push((passcode, long_discriminator, peer_address));
        Ok(())
    }
}

#[derive(Default)]
struct RecordingTransport {
    sent: Mutex<Vec<(CommissionerDeclaration, SocketAddr)>>,
}

#[async_trait]
impl DeclarationTransportPort for RecordingTransport {
    async fn send_declaration(
        &self,
        declaration: CommissionerDeclaration,
        destination: SocketAddr,
    ) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push((declaration, destination));
        Ok(())
    }
}

fn peer(port: u16) -> SocketAddr {
    SocketAddr::from(([192, 168, 4, 20], port))
}

fn request(name: &str, port: u16) -> PeerSession {
    PeerSession::new(InstanceName::new(name).unwrap(), peer(port))
        .with_identity(0xFFF1, 0x8001)
        .with_cd_port(5550)
        .with_long_discriminator(1234)
}

fn config_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn configured_runtime_negotiates_with_logging_prompter() {
    let file = config_file(
        r#"
        [registry]
        capacity = 1
        client_timeout_secs = 60
    "#,
    );
    let config = load_config(file.path()).unwrap();
    let commissioner = Arc::new(RecordingCommissioner::default());
    let runtime = build_controller(
        &config,
        ControllerDeps {
            commissioner_callback: Some(commissioner.clone()),
            ..ControllerDeps::default()
        },
    );
    assert_eq!(runtime.sessions.capacity(), 1);

    runtime.receive_request(request("A", 5540)).await.unwrap();
    runtime.controller.confirm_consent().await.unwrap();
    runtime.controller.proceed_with_passcode(20202021).await.unwrap();

    assert_eq!(
        commissioner.calls.lock().unwrap().clone(),
        vec![(20202021, 1234, peer(5540))]
    );
    let record = runtime.sessions.find_by_peer_address(peer(5540)).await.unwrap();
    assert_eq!(record.processing_state(), SessionProcessingState::Commissioning);
}

#[tokio::test]
async fn full_session_table_rejects_new_requests() {
    let file = config_file("[registry]\ncapacity = 1\n");
    let config = load_config(file.path()).unwrap();
    let runtime = build_controller(&config, ControllerDeps::default());

    runtime.receive_request(request("A", 5540)).await.unwrap();
    runtime.controller.reset().await;
    let err = runtime
        .receive_request(request("B", 5541))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        NegotiationError::Registry(RegistryError::StorageFull { capacity: 1 })
    ));
}

#[tokio::test]
async fn repeated_request_during_handoff_does_not_restart_negotiation() {
    let config = load_config(config_file("").path()).unwrap();
    let commissioner = Arc::new(RecordingCommissioner::default());
    let runtime = build_controller(
        &config,
        ControllerDeps {
            commissioner_callback: Some(commissioner.clone()),
            ..ControllerDeps::default()
        },
    );
    runtime.receive_request(request("A", 5540)).await.unwrap();
    runtime.controller.confirm_consent().await.unwrap();
    runtime.controller.proceed_with_passcode(1111).await.unwrap();

    let err = runtime
        .receive_request(request("A", 5540))
        .await
        .unwrap_err();
    assert!(matches!(err, NegotiationError::NotReady { .. }));

    let record = runtime.sessions.find_by_peer_address(peer(5540)).await.unwrap();
    assert_eq!(record.processing_state(), SessionProcessingState::Commissioning);
    assert!(runtime.controller.confirm_consent().await.is_err());
    assert!(runtime.controller.proceed_with_passcode(2222).await.is_err());
    assert_eq!(
        commissioner.calls.lock().unwrap().clone(),
        vec![(1111, 1234, peer(5540))]
    );
}

#[tokio::test]
async fn cached_passcode_ready_signal_skips_consent() {
    let config = load_config(config_file("").path()).unwrap();
    let commissioner = Arc::new(RecordingCommissioner::default());
    let transport = Arc::new(RecordingTransport::default());
    let runtime = build_controller(
        &config,
        ControllerDeps {
            transport: Some(transport.clone()),
            commissioner_callback: Some(commissioner.clone()),
            ..ControllerDeps::default()
        },
    );

    let ready = request("A", 5540)
        .with_cached_commissioner_passcode(87654321)
        .with_flags(SessionFlags {
            commissioner_passcode_ready: true,
            ..SessionFlags::default()
        });
    runtime.receive_request(ready).await.unwrap();

    assert_eq!(
        commissioner.calls.lock().unwrap().clone(),
        vec![(87654321, 1234, peer(5540))]
    );
    assert!(transport.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn observe_peer_creates_awaiting_consent_record() {
    let runtime = build_controller(&Default::default(), ControllerDeps::default());
    let name = InstanceName::new("C0FFEE").unwrap();

    let record = runtime.observe_peer(&name, peer(5540)).await.unwrap();

    assert_eq!(record.processing_state(), SessionProcessingState::AwaitingConsent);
    assert_eq!(runtime.sessions.find_by_peer_address(peer(5540)).await, Some(record));
}
