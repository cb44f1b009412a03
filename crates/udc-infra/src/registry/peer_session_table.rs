//! Fixed-capacity in-memory peer session table.
//!
//! 会话表：容量固定，空闲超时的记录对查询不可见并可被复用。

use async_trait::async_trait;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use udc_core::{
    config::RegistryConfig,
    ports::{ClockPort, PeerSessionRegistryPort, RegistryError},
    InstanceName, Passcode, PeerSession, NO_PASSCODE, SessionProcessingState, TargetAppList,
};

pub struct InMemoryPeerSessionTable {
    slots: Mutex<Vec<PeerSession>>,
    capacity: usize,
    timeout_ms: i64,
    clock: Arc<dyn ClockPort>,
}

impl InMemoryPeerSessionTable {
    pub fn new(capacity: usize, client_timeout_secs: u64, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            slots: Mutex::new(Vec::with_capacity(capacity)),
            capacity,
            timeout_ms: (client_timeout_secs as i64).saturating_mul(1000),
            clock,
        }
    }

    pub fn from_config(config: &RegistryConfig, clock: Arc<dyn ClockPort>) -> Self {
        Self::new(config.capacity, config.client_timeout_secs, clock)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn deadline(&self, now_ms: i64) -> i64 {
        now_ms.saturating_add(self.timeout_ms)
    }

    /// Returns the live record for `instance`, creating one in a free or
    /// expired slot when none exists.
    pub async fn find_or_create(
        &self,
        instance: &InstanceName,
        peer_address: SocketAddr,
    ) -> Result<PeerSession, RegistryError> {
        let now = self.clock.now_ms();
        let mut slots = self.slots.lock().await;
        slots.retain(|s| !(s.instance() == instance && s.is_expired(now)));
        if let Some(existing) = slots
            .iter()
            .find(|s| s.instance() == instance && !s.is_expired(now))
        {
            return Ok(existing.clone());
        }

        let mut record = PeerSession::new(instance.clone(), peer_address);
        record.set_expires_at_ms(self.deadline(now));
        self.place(&mut slots, record.clone(), now)?;
        debug!(instance = %instance, "peer session created");
        Ok(record)
    }

    /// Inserts or replaces the record with the same instance name and
    /// refreshes its expiry.
    pub async fn upsert(&self, mut record: PeerSession) -> Result<(), RegistryError> {
        let now = self.clock.now_ms();
        record.set_expires_at_ms(self.deadline(now));
        let mut slots = self.slots.lock().await;
        if let Some(slot) = slots.iter_mut().find(|s| s.instance() == record.instance()) {
            *slot = record;
            return Ok(());
        }
        self.place(&mut slots, record, now)
    }

    pub async fn find_by_peer_address(&self, peer_address: SocketAddr) -> Option<PeerSession> {
        let now = self.clock.now_ms();
        let slots = self.slots.lock().await;
        slots
            .iter()
            .find(|s| s.peer_address() == peer_address && !s.is_expired(now))
            .cloned()
    }

    /// Refreshes the expiry of a live record.
    pub async fn mark_active(&self, instance: &InstanceName) -> Result<(), RegistryError> {
        let now = self.clock.now_ms();
        let deadline = self.deadline(now);
        let mut slots = self.slots.lock().await;
        let record = slots
            .iter_mut()
            .find(|s| s.instance() == instance && !s.is_expired(now))
            .ok_or(RegistryError::NotFound)?;
        record.set_expires_at_ms(deadline);
        Ok(())
    }

    pub async fn remove(&self, instance: &InstanceName) -> bool {
        let mut slots = self.slots.lock().await;
        let before = slots.len();
        slots.retain(|s| s.instance() != instance);
        before != slots.len()
    }

    pub async fn reset_all(&self) {
        self.slots.lock().await.clear();
    }

    fn place(
        &self,
        slots: &mut Vec<PeerSession>,
        record: PeerSession,
        now: i64,
    ) -> Result<(), RegistryError> {
        if slots.len() < self.capacity {
            slots.push(record);
            return Ok(());
        }
        match slots.iter_mut().find(|s| s.is_expired(now)) {
            Some(slot) => {
                debug!(recycled = %slot.instance(), "reusing expired peer session slot");
                *slot = record;
                Ok(())
            }
            None => {
                warn!(
                    instance = %record.instance(),
                    capacity = self.capacity,
                    "peer session table full"
                );
                Err(RegistryError::StorageFull {
                    capacity: self.capacity,
                })
            }
        }
    }

    async fn with_live_record<T>(
        &self,
        instance: &InstanceName,
        f: impl FnOnce(&mut PeerSession) -> Result<T, RegistryError> + Send,
    ) -> Result<T, RegistryError> {
        let now = self.clock.now_ms();
        let mut slots = self.slots.lock().await;
        let record = slots
            .iter_mut()
            .find(|s| s.instance() == instance && !s.is_expired(now))
            .ok_or(RegistryError::NotFound)?;
        f(record)
    }
}

#[async_trait]
impl PeerSessionRegistryPort for InMemoryPeerSessionTable {
    async fn record_request(&self, mut request: PeerSession) -> Result<(), RegistryError> {
        let now = self.clock.now_ms();
        request.set_expires_at_ms(self.deadline(now));
        let mut slots = self.slots.lock().await;
        if let Some(slot) = slots.iter_mut().find(|s| s.instance() == request.instance()) {
            if request.cached_commissioner_passcode() == NO_PASSCODE && !slot.is_expired(now) {
                request.set_cached_commissioner_passcode(slot.cached_commissioner_passcode());
            }
            *slot = request;
            return Ok(());
        }
        self.place(&mut slots, request, now)
    }

    async fn find_by_instance(
        &self,
        instance: &InstanceName,
    ) -> Result<Option<PeerSession>, RegistryError> {
        let now = self.clock.now_ms();
        let slots = self.slots.lock().await;
        Ok(slots
            .iter()
            .find(|s| s.instance() == instance && !s.is_expired(now))
            .cloned())
    }

    async fn set_processing_state(
        &self,
        instance: &InstanceName,
        state: SessionProcessingState,
    ) -> Result<(), RegistryError> {
        self.with_live_record(instance, |record| {
            record.set_processing_state(state)?;
            Ok(())
        })
        .await
    }

    async fn set_cached_commissioner_passcode(
        &self,
        instance: &InstanceName,
        passcode: Passcode,
    ) -> Result<(), RegistryError> {
        self.with_live_record(instance, |record| {
            record.set_cached_commissioner_passcode(passcode);
            Ok(())
        })
        .await
    }

    async fn update_target_apps(
        &self,
        instance: &InstanceName,
        target_apps: TargetAppList,
    ) -> Result<(), RegistryError> {
        self.with_live_record(instance, |record| {
            record.set_target_apps(target_apps);
            Ok(())
        })
        .await
    }
}
