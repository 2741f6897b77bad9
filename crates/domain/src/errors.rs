//! Error types used throughout keyward

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure reported by a persistent key store
///
/// `NotFound` and `AlreadyExists` are control-flow conditions for the
/// get-or-create path; every other variant is surfaced to the caller as is.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StoreError {
    #[error("record {namespace}/{name} not found")]
    NotFound { namespace: String, name: String },

    #[error("record {namespace}/{name} already exists")]
    AlreadyExists { namespace: String, name: String },

    #[error("permission denied: {message}")]
    PermissionDenied { message: String },

    #[error("store unavailable: {message}")]
    Unavailable { message: String },

    #[error("store operation timed out after {elapsed:?}")]
    Timeout { elapsed: Duration },

    #[error("store backend error: {message}")]
    Backend { message: String },
}

impl StoreError {
    pub fn not_found(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::NotFound { namespace: namespace.into(), name: name.into() }
    }

    pub fn already_exists(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::AlreadyExists { namespace: namespace.into(), name: name.into() }
    }

    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::PermissionDenied { message: message.into() }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable { message: message.into() }
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend { message: message.into() }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }
}

/// Main error type for keyward
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum KeywardError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Entropy source unavailable: {0}")]
    Entropy(String),

    #[error("Invalid key record: {0}")]
    InvalidKeyRecord(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl KeywardError {
    /// Whether the reconciliation loop should requeue with backoff.
    ///
    /// Only transient store conditions qualify; everything else will fail the
    /// same way on the next attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Store(StoreError::Unavailable { .. } | StoreError::Timeout { .. })
        )
    }

    /// Stable label suitable for metrics and log fields.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Store(StoreError::NotFound { .. }) => "store_not_found",
            Self::Store(StoreError::AlreadyExists { .. }) => "store_already_exists",
            Self::Store(StoreError::PermissionDenied { .. }) => "store_permission_denied",
            Self::Store(StoreError::Unavailable { .. }) => "store_unavailable",
            Self::Store(StoreError::Timeout { .. }) => "store_timeout",
            Self::Store(StoreError::Backend { .. }) => "store_backend",
            Self::Entropy(_) => "entropy",
            Self::InvalidKeyRecord(_) => "invalid_key_record",
            Self::InvalidInput(_) => "invalid_input",
            Self::Config(_) => "config",
            Self::Internal(_) => "internal",
        }
    }
}

/// Result type alias for keyward operations
pub type Result<T> = std::result::Result<T, KeywardError>;

/// Result type alias for store adapters
pub type StoreResult<T> = std::result::Result<T, StoreError>;
