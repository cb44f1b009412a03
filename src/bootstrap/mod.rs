pub mod config;
pub mod tracing;
pub mod wiring;

pub use config::{load_config, load_config_or_default};
pub use self::tracing::init_tracing_subscriber;
pub use wiring::{build_controller, CommissionerRuntime, ControllerDeps};
