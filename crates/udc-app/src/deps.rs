//! # Negotiation Dependencies / 协商依赖
//!
//! Parameter grouping for controller construction.
//! 控制器构造的参数打包。
//!
//! **Note / 注意**: This is NOT a Builder pattern.
//! - No build steps / 无构建步骤
//! - No hidden logic / 无隐藏逻辑
//!
//! Every port is an optional capability slot: `None` means the feature is not
//! configured and the controller skips it.
//! 每个端口都是可选能力：`None` 表示未配置，控制器跳过对应步骤。

use std::sync::Arc;
use udc_core::ports::*;

#[derive(Clone, Default)]
pub struct NegotiationPorts {
    pub registry: Option<Arc<dyn PeerSessionRegistryPort>>,
    pub transport: Option<Arc<dyn DeclarationTransportPort>>,
    pub prompter: Option<Arc<dyn UserPrompterPort>>,
    pub passcode_service: Option<Arc<dyn PasscodeServicePort>>,
    pub commissioner_callback: Option<Arc<dyn CommissionerCallbackPort>>,
    pub post_commissioning_listener: Option<Arc<dyn PostCommissioningListenerPort>>,
}
