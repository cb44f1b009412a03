//! Commissioner configuration data structures (TOML → DTO).

mod commissioner_config;

pub use commissioner_config::{
    CommissionerConfig, CommissionerSection, LoggingConfig, RegistryConfig,
};
