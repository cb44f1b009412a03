use std::path::PathBuf;

use tracing::info;
use udc_commissioner_lib::{
    build_controller, init_tracing_subscriber, load_config_or_default, ControllerDeps,
};

const DEFAULT_CONFIG_PATH: &str = "udc-commissioner.toml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let config = load_config_or_default(&config_path)?;
    init_tracing_subscriber(&config.logging)?;

    let runtime = build_controller(&config, ControllerDeps::default());
    info!(
        config = %config_path.display(),
        capacity = runtime.sessions.capacity(),
        "commissioner ready, waiting for commissionee requests"
    );

    tokio::signal::ctrl_c().await?;
    runtime.controller.reset().await;
    runtime.sessions.reset_all().await;
    info!("commissioner stopped");
    Ok(())
}
