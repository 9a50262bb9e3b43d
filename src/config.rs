//! Configuration for the schema store
//!
//! The library never reads process state on its own: callers build a
//! [`StoreConfig`] and pass it in. [`AppConfig::load_from`] is the layered
//! loader the CLI uses, reading from:
//! - Default values
//! - Config file (schema-store.toml)
//! - Environment variables (SCHEMA_STORE__*)
//!
//! ## Example config file (schema-store.toml):
//! ```toml
//! [store]
//! endpoints = ["http://127.0.0.1:2379"]
//! dial_timeout_ms = 5000
//! operation_timeout_ms = 5000
//! ```

use std::time::Duration;

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Top-level configuration file layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Store connection settings
    #[serde(default)]
    pub store: StoreConfig,
}

/// Connection and deadline settings for the key-value store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store endpoint addresses
    #[serde(default = "default_endpoints")]
    pub endpoints: Vec<String>,

    /// Connection establishment timeout
    #[serde(default = "default_timeout_ms")]
    pub dial_timeout_ms: u64,

    /// Deadline applied to every repository operation
    #[serde(default = "default_timeout_ms")]
    pub operation_timeout_ms: u64,
}

fn default_endpoints() -> Vec<String> {
    vec!["http://127.0.0.1:2379".to_string()]
}

fn default_timeout_ms() -> u64 {
    5_000
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            endpoints: default_endpoints(),
            dial_timeout_ms: default_timeout_ms(),
            operation_timeout_ms: default_timeout_ms(),
        }
    }
}

impl StoreConfig {
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoints: vec![endpoint.into()],
            ..Self::default()
        }
    }

    pub fn dial_timeout(&self) -> Duration {
        Duration::from_millis(self.dial_timeout_ms)
    }

    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }

    /// Check that the settings can be used to build a store.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoints.iter().all(|e| e.trim().is_empty()) {
            return Err(ConfigError::Message("store.endpoints must not be empty".into()));
        }
        if self.dial_timeout_ms == 0 || self.operation_timeout_ms == 0 {
            return Err(ConfigError::Message("store timeouts must be non-zero".into()));
        }
        Ok(())
    }
}

impl AppConfig {
    /// Load configuration, with an optional explicit file layered on top
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        for location in [
            "schema-store.toml",
            ".schema-store.toml",
            "config/schema-store.toml",
        ] {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(dirs) = directories::ProjectDirs::from("dev", "familiar", "schema-store") {
            let xdg_config = dirs.config_dir().join("schema-store.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("SCHEMA_STORE")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("store.endpoints")
                .try_parsing(true),
        );

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.store.validate()?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.endpoints, vec!["http://127.0.0.1:2379"]);
        assert_eq!(config.operation_timeout(), Duration::from_secs(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let mut config = StoreConfig::default();
        config.operation_timeout_ms = 0;
        assert!(config.validate().is_err());

        let config = StoreConfig {
            endpoints: vec![],
            ..StoreConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.toml");
        let path = path.to_str().unwrap();

        let config = AppConfig {
            store: StoreConfig {
                endpoints: vec!["http://etcd-0:2379".into(), "http://etcd-1:2379".into()],
                dial_timeout_ms: 1_000,
                operation_timeout_ms: 2_500,
            },
        };
        config.save(path).unwrap();

        let loaded = AppConfig::load_from(Some(path)).unwrap();
        assert_eq!(loaded.store, config.store);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "[store]\noperation_timeout_ms = 750\n").unwrap();

        let loaded = AppConfig::load_from(path.to_str()).unwrap();
        assert_eq!(loaded.store.operation_timeout(), Duration::from_millis(750));
        assert_eq!(loaded.store.dial_timeout_ms, 5_000);
    }
}
