use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use super::{SessionProcessingState, TargetAppList, TransitionError};
use crate::commissioning::{Passcode, ProductId, VendorId, NO_PASSCODE};
use crate::ids::{DeviceName, InstanceName, PairingInstruction, RotatingId};

/// Passcode-related flags announced by the commissionee.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionFlags {
    /// Peer asks the commissioner to generate and display a passcode.
    pub commissioner_passcode: bool,
    /// Peer says the previously generated passcode has been entered.
    pub commissioner_passcode_ready: bool,
    /// Peer withdraws its earlier request.
    pub cancel_passcode: bool,
    /// Peer has no passcode of its own to offer.
    pub no_passcode: bool,
    /// Peer wants a declaration when the passcode dialog is shown.
    pub cd_upon_passcode_dialog: bool,
}

/// One in-progress negotiation with one commissionee instance.
///
/// 会话记录由注册表创建和回收；控制器只通过注册表端口修改它。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerSession {
    instance: InstanceName,
    vendor_id: VendorId,
    product_id: ProductId,
    device_name: DeviceName,
    rotating_id: RotatingId,
    peer_address: SocketAddr,
    /// Zero means the peer does not accept declarations.
    cd_port: u16,
    long_discriminator: u16,
    pairing_hint: u16,
    pairing_instruction: PairingInstruction,
    processing_state: SessionProcessingState,
    target_apps: TargetAppList,
    cached_commissioner_passcode: Passcode,
    flags: SessionFlags,
    expires_at_ms: i64,
}

impl PeerSession {
    pub fn new(instance: InstanceName, peer_address: SocketAddr) -> Self {
        Self {
            instance,
            vendor_id: 0,
            product_id: 0,
            device_name: DeviceName::default(),
            rotating_id: RotatingId::default(),
            peer_address,
            cd_port: 0,
            long_discriminator: 0,
            pairing_hint: 0,
            pairing_instruction: PairingInstruction::default(),
            processing_state: SessionProcessingState::AwaitingConsent,
            target_apps: TargetAppList::new(),
            cached_commissioner_passcode: NO_PASSCODE,
            flags: SessionFlags::default(),
            expires_at_ms: 0,
        }
    }

    pub fn with_identity(mut self, vendor_id: VendorId, product_id: ProductId) -> Self {
        self.vendor_id = vendor_id;
        self.product_id = product_id;
        self
    }

    pub fn with_device_name(mut self, device_name: DeviceName) -> Self {
        self.device_name = device_name;
        self
    }

    pub fn with_rotating_id(mut self, rotating_id: RotatingId) -> Self {
        self.rotating_id = rotating_id;
        self
    }

    pub fn with_cd_port(mut self, cd_port: u16) -> Self {
        self.cd_port = cd_port;
        self
    }

    pub fn with_long_discriminator(mut self, long_discriminator: u16) -> Self {
        self.long_discriminator = long_discriminator;
        self
    }

    pub fn with_pairing(mut self, hint: u16, instruction: PairingInstruction) -> Self {
        self.pairing_hint = hint;
        self.pairing_instruction = instruction;
        self
    }

    pub fn with_target_apps(mut self, target_apps: TargetAppList) -> Self {
        self.target_apps = target_apps;
        self
    }

    pub fn with_flags(mut self, flags: SessionFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_cached_commissioner_passcode(mut self, passcode: Passcode) -> Self {
        self.cached_commissioner_passcode = passcode;
        self
    }

    pub fn instance(&self) -> &InstanceName {
        &self.instance
    }

    pub fn vendor_id(&self) -> VendorId {
        self.vendor_id
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn device_name(&self) -> &DeviceName {
        &self.device_name
    }

    pub fn rotating_id(&self) -> &RotatingId {
        &self.rotating_id
    }

    pub fn rotating_id_hex(&self) -> String {
        self.rotating_id.to_upper_hex()
    }

    pub fn peer_address(&self) -> SocketAddr {
        self.peer_address
    }

    pub fn cd_port(&self) -> u16 {
        self.cd_port
    }

    pub fn long_discriminator(&self) -> u16 {
        self.long_discriminator
    }

    pub fn pairing_hint(&self) -> u16 {
        self.pairing_hint
    }

    pub fn pairing_instruction(&self) -> &PairingInstruction {
        &self.pairing_instruction
    }

    pub fn processing_state(&self) -> SessionProcessingState {
        self.processing_state
    }

    pub fn target_apps(&self) -> &TargetAppList {
        &self.target_apps
    }

    pub fn cached_commissioner_passcode(&self) -> Passcode {
        self.cached_commissioner_passcode
    }

    pub fn flags(&self) -> SessionFlags {
        self.flags
    }

    pub fn expires_at_ms(&self) -> i64 {
        self.expires_at_ms
    }

    /// UDP destination for declarations: the peer's IP with the declaration port.
    /// `None` when the peer does not accept declarations.
    pub fn declaration_destination(&self) -> Option<SocketAddr> {
        if self.cd_port == 0 {
            return None;
        }
        Some(SocketAddr::new(self.peer_address.ip(), self.cd_port))
    }

    pub fn accepts_declarations(&self) -> bool {
        self.cd_port != 0
    }

    /// Moves to `next` if the transition table allows it.
    pub fn set_processing_state(
        &mut self,
        next: SessionProcessingState,
    ) -> Result<(), TransitionError> {
        let previous = self.processing_state;
        self.processing_state = previous.transition(next)?;
        #[cfg(feature = "tracing")]
        tracing::debug!(
            instance = %self.instance,
            from = %previous,
            to = %next,
            "peer session state changed"
        );
        Ok(())
    }

    pub fn set_cached_commissioner_passcode(&mut self, passcode: Passcode) {
        self.cached_commissioner_passcode = passcode;
    }

    pub fn set_target_apps(&mut self, target_apps: TargetAppList) {
        self.target_apps = target_apps;
    }

    pub fn set_expires_at_ms(&mut self, expires_at_ms: i64) {
        self.expires_at_ms = expires_at_ms;
    }

    /// Expired records are invisible to the registry and may be recycled.
    pub fn is_expired(&self, now_ms: i64) -> bool {
        self.expires_at_ms <= now_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    fn session() -> PeerSession {
        PeerSession::new(
            InstanceName::new("C0FFEE").unwrap(),
            SocketAddr::new(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 20)), 5550),
        )
    }

    #[test]
    fn new_session_awaits_consent_with_no_cached_passcode() {
        let s = session();
        assert_eq!(s.processing_state(), SessionProcessingState::AwaitingConsent);
        assert_eq!(s.cached_commissioner_passcode(), NO_PASSCODE);
        assert!(s.target_apps().is_empty());
    }

    #[test]
    fn declaration_destination_uses_peer_ip_and_cd_port() {
        assert_eq!(session().declaration_destination(), None);

        let s = session().with_cd_port(5551);
        assert_eq!(
            s.declaration_destination(),
            Some("192.168.1.20:5551".parse().unwrap())
        );
    }

    #[test]
    fn set_processing_state_enforces_table() {
        let mut s = session();
        s.set_processing_state(SessionProcessingState::Declined)
            .unwrap();
        assert!(s
            .set_processing_state(SessionProcessingState::ResolvingPasscode)
            .is_err());
        assert_eq!(s.processing_state(), SessionProcessingState::Declined);
    }

    #[test]
    fn rotating_id_is_rendered_upper_hex() {
        let s = session().with_rotating_id(RotatingId::new(vec![0xab, 0x01]).unwrap());
        assert_eq!(s.rotating_id_hex(), "AB01");
    }

    #[test]
    fn expiry_is_inclusive_of_deadline() {
        let mut s = session();
        s.set_expires_at_ms(1_000);
        assert!(!s.is_expired(999));
        assert!(s.is_expired(1_000));
    }
}
