//! Tracing configuration for the commissioner
//!
//! ## Behavior / 行为
//!
//! - **Environment filter**: configured level + directives, `RUST_LOG` wins when set
//! - **stdout**: always on
//! - **File**: non-blocking appender when `[logging] file` is set
//!
//! Output format: `2025-01-15 10:30:45.123 INFO [file.rs:42] [target] message`

use std::{fs, io, path::Path, sync::OnceLock};

use anyhow::Context;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, fmt::writer::BoxMakeWriter, prelude::*, registry, EnvFilter};
use udc_core::LoggingConfig;

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Build the filter directives from config
///
/// 配置的级别在前，附加指令按原样追加。
fn build_filter_directives(config: &LoggingConfig) -> Vec<String> {
    let level = if config.level.trim().is_empty() {
        "info".to_string()
    } else {
        config.level.trim().to_string()
    };
    std::iter::once(level)
        .chain(config.directives.iter().cloned())
        .collect()
}

/// Initialize the global tracing subscriber
///
/// Call once from `main` before the controller is built.
///
/// ## Errors / 错误
///
/// Returns `Err` if:
/// - A subscriber is already registered
/// - The configured directives do not parse
/// - The log file directory cannot be created
pub fn init_tracing_subscriber(config: &LoggingConfig) -> anyhow::Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(build_filter_directives(config).join(","))
            .context("Invalid logging directives")?,
    };

    let stdout_writer: BoxMakeWriter = BoxMakeWriter::new(io::stdout);
    let stdout_layer = fmt::layer()
        .with_timer(fmt::time::ChronoUtc::new(TIMESTAMP_FORMAT.to_string()))
        .with_level(true)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_ansi(cfg!(not(test)))
        .with_writer(stdout_writer);

    let file_layer = match &config.file {
        Some(path) => {
            let writer = build_file_writer(path)?;
            Some(
                fmt::layer()
                    .with_timer(fmt::time::ChronoUtc::new(TIMESTAMP_FORMAT.to_string()))
                    .with_level(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_target(true)
                    .with_ansi(false)
                    .with_writer(writer),
            )
        }
        None => None,
    };

    registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .context("Tracing subscriber already initialized")?;

    Ok(())
}

fn build_file_writer(path: &Path) -> anyhow::Result<NonBlocking> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Log file path has no file name: {}", path.display()))?;
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;

    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    LOG_GUARD
        .set(guard)
        .map_err(|_| anyhow::anyhow!("Tracing log guard already initialized"))?;

    Ok(non_blocking)
}
