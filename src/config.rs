//! Configuration Module
//!
//! This module defines all configuration structures for the validator node.
//! Configuration is loaded from TOML files and parsed using serde.

use crate::validation::{FreshnessPolicy, KeyNamespace};
use anyhow::bail;
use chrono::Duration;
use serde::Deserialize;
use std::fs;

/// Main configuration structure
///
/// Loaded from a TOML file (e.g., config/default.toml). Every section is
/// optional and falls back to its defaults.
///
/// # Example TOML
/// ```toml
/// [validation]
/// freshness_window_secs = 60
/// node_key_prefix = "node~"
///
/// [api]
/// host = "127.0.0.1"
/// port = 7051
///
/// [storage]
/// backend = "sqlite"
/// url = "sqlite://ledger.db"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub validation: ValidationConfig,
    pub api: ApiConfig,
    pub storage: StorageConfig,
}

/// Transaction validation rules
///
/// # Fields
/// - `freshness_window_secs`: Maximum age of a transaction timestamp
/// - `max_future_skew_secs`: How far a transaction timestamp may run ahead of the local clock
/// - `node_key_prefix`: Key prefix under which node reputation records are stored
/// - `allow_unchecked_submit`: Enables `submitUncheckedTransaction`
/// - `legacy_two_arg_submit`: Routes two-argument `submitTransaction` calls to the unchecked path;
///   has no effect unless `allow_unchecked_submit` is also set
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub freshness_window_secs: u32,
    pub max_future_skew_secs: u32,
    pub node_key_prefix: String,
    pub allow_unchecked_submit: bool,
    pub legacy_two_arg_submit: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            freshness_window_secs: 60,
            max_future_skew_secs: 60,
            node_key_prefix: "node~".to_string(),
            allow_unchecked_submit: true,
            legacy_two_arg_submit: false,
        }
    }
}

impl ValidationConfig {
    pub fn freshness_policy(&self) -> FreshnessPolicy {
        FreshnessPolicy::new(
            Duration::seconds(i64::from(self.freshness_window_secs)),
            Duration::seconds(i64::from(self.max_future_skew_secs)),
        )
    }

    pub fn key_namespace(&self) -> KeyNamespace {
        KeyNamespace::new(self.node_key_prefix.clone())
    }
}

/// API server configuration
///
/// # Fields
/// - `host`: IP address to bind to (e.g., "127.0.0.1" or "0.0.0.0")
/// - `port`: TCP port to listen on
/// - `stamp_on_receipt`: Assign the server clock as transaction timestamp when a request carries none
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub stamp_on_receipt: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7051,
            stamp_on_receipt: true,
        }
    }
}

/// State store configuration
///
/// # Fields
/// - `backend`: "memory" or "sqlite"
/// - `url`: Database connection URL, used by the sqlite backend (e.g., "sqlite://ledger.db")
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: String,
    pub url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
            url: "sqlite://ledger.db".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the TOML configuration file
    ///
    /// # Returns
    /// * `Ok(Config)` if the file was read, parsed and passed validation
    /// * `Err` if the file couldn't be read, the TOML is invalid, or a value is out of range
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.validation.freshness_window_secs == 0 {
            bail!("validation.freshness_window_secs must be greater than zero");
        }
        if self.validation.node_key_prefix.is_empty() {
            bail!("validation.node_key_prefix must not be empty");
        }
        match self.storage.backend.as_str() {
            "memory" | "sqlite" => Ok(()),
            other => bail!("unknown storage backend {:?}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.validation.freshness_window_secs, 60);
        assert_eq!(config.validation.node_key_prefix, "node~");
        assert!(!config.validation.legacy_two_arg_submit);
        assert_eq!(config.storage.backend, "memory");
        assert_eq!(
            config.validation.freshness_policy(),
            FreshnessPolicy::default()
        );
    }

    #[test]
    fn test_partial_sections_override() {
        let config = Config::parse(
            r#"
            [validation]
            freshness_window_secs = 30
            legacy_two_arg_submit = true

            [api]
            port = 9000
            "#,
        )
        .unwrap();
        assert_eq!(config.validation.freshness_window_secs, 30);
        assert!(config.validation.legacy_two_arg_submit);
        assert_eq!(config.api.port, 9000);
        assert_eq!(config.api.host, "127.0.0.1");
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(Config::parse("[validation]\nfreshness_window_secs = 0").is_err());
        assert!(Config::parse("[validation]\nnode_key_prefix = \"\"").is_err());
        assert!(Config::parse("[storage]\nbackend = \"redis\"").is_err());
    }
}
