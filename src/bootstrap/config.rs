//! # Configuration Loader / 配置加载器
//!
//! Reads the commissioner TOML file. Missing sections and keys fall back to
//! [`CommissionerConfig::default`]; unknown keys are ignored.
//! 仅负责加载，不做业务校验。

use anyhow::Context;
use std::path::Path;
use tracing::info;
use udc_core::CommissionerConfig;

/// Load configuration from a TOML file
/// 从 TOML 文件加载配置
///
/// # Errors / 错误
///
/// Returns error if:
/// - File exists but cannot be read (I/O error)
/// - Content is not valid TOML or does not map onto the config (parse error)
pub fn load_config(config_path: &Path) -> anyhow::Result<CommissionerConfig> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    toml::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config as TOML: {}",
            config_path.display()
        )
    })
}

/// Like [`load_config`], but a missing file yields the defaults.
pub fn load_config_or_default(config_path: &Path) -> anyhow::Result<CommissionerConfig> {
    if !config_path.exists() {
        info!(
            path = %config_path.display(),
            "config file not found, using defaults"
        );
        return Ok(CommissionerConfig::default());
    }
    load_config(config_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();
        temp_file
    }

    /// Test that valid TOML is parsed correctly
    /// 测试有效 TOML 被正确解析
    #[test]
    fn test_load_config_reads_valid_toml() {
        let temp_file = write_temp(
            r#"
            [registry]
            capacity = 8
            client_timeout_secs = 600

            [logging]
            level = "debug"
            directives = ["udc_infra=warn"]

            [commissioner]
            displays_passcode_and_qr_code = true
        "#,
        );

        let config = load_config(temp_file.path()).unwrap();

        assert_eq!(config.registry.capacity, 8);
        assert_eq!(config.registry.client_timeout_secs, 600);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.directives, vec!["udc_infra=warn".to_string()]);
        assert!(config.commissioner.displays_passcode_and_qr_code);
    }

    #[test]
    fn test_empty_file_yields_defaults() {
        let temp_file = write_temp("");

        let config = load_config(temp_file.path()).unwrap();

        assert_eq!(config, CommissionerConfig::default());
    }

    #[test]
    fn test_invalid_toml_reports_path() {
        let temp_file = write_temp("[registry\ncapacity = ");

        let err = load_config(temp_file.path()).unwrap_err();

        assert!(format!("{err:#}").contains("Failed to parse config as TOML"));
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        let temp_file = write_temp("[registry]\ncapacity = \"many\"\n");

        assert!(load_config(temp_file.path()).is_err());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        assert!(load_config(&path).is_err());
        assert_eq!(
            load_config_or_default(&path).unwrap(),
            CommissionerConfig::default()
        );
    }
}
