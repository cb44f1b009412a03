use serde::{Deserialize, Serialize};

use crate::commissioning::CommissionedPeer;
use crate::ids::InstanceName;

/// Single-flight gate of the commissioner.
///
/// `ready == true` means idle: no negotiation is active and `current_instance`
/// is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NegotiationGate {
    ready: bool,
    current_instance: Option<InstanceName>,
    pending_consent: bool,
    last_commissioned: Option<CommissionedPeer>,
}

impl Default for NegotiationGate {
    fn default() -> Self {
        Self::idle()
    }
}

impl NegotiationGate {
    pub fn idle() -> Self {
        Self {
            ready: true,
            current_instance: None,
            pending_consent: false,
            last_commissioned: None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn current_instance(&self) -> Option<&InstanceName> {
        self.current_instance.as_ref()
    }

    /// Active instance, only while busy.
    pub fn active_instance(&self) -> Option<&InstanceName> {
        if self.ready {
            None
        } else {
            self.current_instance.as_ref()
        }
    }

    pub fn is_pending_consent(&self) -> bool {
        self.pending_consent
    }

    pub fn last_commissioned(&self) -> Option<&CommissionedPeer> {
        self.last_commissioned.as_ref()
    }

    /// Marks the gate busy with `instance` and waits for consent.
    pub fn begin(&mut self, instance: InstanceName) {
        self.ready = false;
        self.current_instance = Some(instance);
        self.pending_consent = true;
    }

    /// Operator said no. The gate stays busy until `reset`.
    pub fn decline(&mut self) {
        self.pending_consent = false;
    }

    pub fn record_commissioned(&mut self, peer: CommissionedPeer) {
        self.last_commissioned = Some(peer);
    }

    pub fn reset(&mut self) {
        *self = Self::idle();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance() -> InstanceName {
        InstanceName::new("C0FFEE").unwrap()
    }

    #[test]
    fn starts_idle() {
        let gate = NegotiationGate::default();
        assert!(gate.is_ready());
        assert!(gate.active_instance().is_none());
        assert!(!gate.is_pending_consent());
    }

    #[test]
    fn begin_marks_busy_and_pending() {
        let mut gate = NegotiationGate::idle();
        gate.begin(instance());
        assert!(!gate.is_ready());
        assert_eq!(gate.active_instance(), Some(&instance()));
        assert!(gate.is_pending_consent());
    }

    #[test]
    fn decline_keeps_gate_busy() {
        let mut gate = NegotiationGate::idle();
        gate.begin(instance());
        gate.decline();
        assert!(!gate.is_ready());
        assert!(!gate.is_pending_consent());
        assert_eq!(gate.active_instance(), Some(&instance()));
    }

    #[test]
    fn reset_clears_everything() {
        let mut gate = NegotiationGate::idle();
        gate.begin(instance());
        gate.record_commissioned(CommissionedPeer {
            vendor_id: 1,
            product_id: 2,
            node_id: 3,
        });
        gate.reset();
        assert_eq!(gate, NegotiationGate::idle());
    }
}
