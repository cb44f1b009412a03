//! UDC Commissioner
//!
//! 用户主导配网（UDC）协商的装配层：加载配置、初始化日志、组装控制器。

pub mod adapters;
pub mod bootstrap;

pub use bootstrap::{
    build_controller, init_tracing_subscriber, load_config, load_config_or_default,
    CommissionerRuntime, ControllerDeps,
};
