//! Configuration management

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_KEY_SECRET_NAME, DEFAULT_LOG_FILTER, DEFAULT_STORE_TIMEOUT_MS, IV_ANNOTATION,
    KEY_DATA_FIELD,
};
use crate::impl_domain_enum_conversions;

/// Keyward configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywardConfig {
    #[serde(default)]
    pub provisioning: ProvisioningConfig,
    #[serde(default)]
    pub iv: IvConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Key provisioning configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvisioningConfig {
    /// Record name inside each cluster namespace
    pub secret_name: String,
    /// Data field holding the raw key bytes
    pub key_field: String,
    /// Upper bound for a single store call
    pub store_timeout_ms: u64,
}

impl ProvisioningConfig {
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }
}

impl Default for ProvisioningConfig {
    fn default() -> Self {
        Self {
            secret_name: DEFAULT_KEY_SECRET_NAME.to_string(),
            key_field: KEY_DATA_FIELD.to_string(),
            store_timeout_ms: DEFAULT_STORE_TIMEOUT_MS,
        }
    }
}

/// Initialization vector configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IvConfig {
    /// Metadata annotation pinning a document's IV
    pub annotation: String,
}

impl Default for IvConfig {
    fn default() -> Self {
        Self { annotation: IV_ANNOTATION.to_string() }
    }
}

/// Persistent store backend selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    File,
}

impl_domain_enum_conversions!(StoreBackend {
    Memory => "memory",
    File => "file",
});

/// Persistent store configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Root directory for the file backend
    pub root: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, overridden by `RUST_LOG` when set
    pub filter: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: DEFAULT_LOG_FILTER.to_string(), json: false }
    }
}
