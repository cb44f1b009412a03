use async_trait::async_trait;

use crate::{
    commissioning::Passcode,
    ids::InstanceName,
    ports::errors::RegistryError,
    session::{PeerSession, SessionProcessingState, TargetAppList},
};

/// Peer session registry, keyed by instance name.
///
/// 控制器只能通过该端口读写会话记录。
#[async_trait]
pub trait PeerSessionRegistryPort: Send + Sync {
    /// Store the latest view of a commissionee's request.
    ///
    /// Replaces the peer-supplied fields of an existing live record (or
    /// creates one). A commissioner passcode cached on the existing record is
    /// kept when the request carries none.
    async fn record_request(&self, request: PeerSession) -> Result<(), RegistryError>;

    /// 根据实例名查询会话；过期记录视为不存在
    async fn find_by_instance(
        &self,
        instance: &InstanceName,
    ) -> Result<Option<PeerSession>, RegistryError>;

    /// 按状态转移表修改处理状态
    async fn set_processing_state(
        &self,
        instance: &InstanceName,
        state: SessionProcessingState,
    ) -> Result<(), RegistryError>;

    /// 缓存控制器生成的配对码
    async fn set_cached_commissioner_passcode(
        &self,
        instance: &InstanceName,
        passcode: Passcode,
    ) -> Result<(), RegistryError>;

    /// 覆盖目标应用列表（用于记录检查结果）
    async fn update_target_apps(
        &self,
        instance: &InstanceName,
        target_apps: TargetAppList,
    ) -> Result<(), RegistryError>;
}
