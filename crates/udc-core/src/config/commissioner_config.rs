//! Commissioner configuration domain model

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Commissioner configuration
///
/// Every section is optional in the file; missing keys fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommissionerConfig {
    /// Peer session registry settings
    pub registry: RegistryConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// Operator-facing behaviour
    pub commissioner: CommissionerSection,
}

/// Peer session registry configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Maximum number of peer session records held at once
    pub capacity: usize,

    /// Idle time after which a record expires (seconds)
    pub client_timeout_secs: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            capacity: 2,
            client_timeout_secs: 30 * 60,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level (`trace` .. `error`)
    pub level: String,

    /// Extra filter directives, e.g. `udc_app=debug`
    pub directives: Vec<String>,

    /// Optional log file; stdout only when unset
    /// 日志文件路径，未设置时仅输出到 stdout
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directives: Vec::new(),
            file: None,
        }
    }
}

/// Commissioner UX configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommissionerSection {
    /// Whether the passcode prompt also renders a QR code
    pub displays_passcode_and_qr_code: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CommissionerConfig::default();
        assert_eq!(config.registry.capacity, 2);
        assert_eq!(config.registry.client_timeout_secs, 1800);
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.directives.is_empty());
        assert!(!config.commissioner.displays_passcode_and_qr_code);
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let toml_str = r#"
            [registry]
            capacity = 4

            [commissioner]
            displays_passcode_and_qr_code = true
        "#;
        let config: CommissionerConfig = toml::from_str(toml_str).unwrap();

        assert_eq!(config.registry.capacity, 4);
        assert_eq!(config.registry.client_timeout_secs, 1800);
        assert_eq!(config.logging, LoggingConfig::default());
        assert!(config.commissioner.displays_passcode_and_qr_code);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let toml_str = r#"
            [logging]
            level = "debug"
            directives = ["udc_app=trace"]
            colour = "always"
        "#;
        let config: CommissionerConfig = toml::from_str(toml_str).unwrap();

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.directives, vec!["udc_app=trace".to_string()]);
        assert!(config.logging.file.is_none());
    }

    #[test]
    fn test_log_file_path() {
        let toml_str = r#"
            [logging]
            file = "/var/log/udc/commissioner.log"
        "#;
        let config: CommissionerConfig = toml::from_str(toml_str).unwrap();

        assert_eq!(
            config.logging.file,
            Some(PathBuf::from("/var/log/udc/commissioner.log"))
        );
        assert_eq!(config.logging.level, "info");
    }
}
