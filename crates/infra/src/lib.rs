//! # Keyward Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - Key record store adapters (in-memory, file-backed)
//! - Configuration loading (files and `KEYWARD_*` environment variables)
//! - Tracing subscriber setup
//!
//! ## Architecture
//! - Implements traits defined in `keyward-core`
//! - Contains all "impure" code (filesystem, environment, global subscriber)

pub mod config;
pub mod errors;
pub mod observability;
pub mod stores;

use keyward_core::PolicyEncryption;
use keyward_domain::{KeywardConfig, Result};

// Re-export commonly used items
pub use errors::IntoStoreError;
pub use observability::init_tracing;
pub use stores::{build_store, FileKeyStore, InMemoryKeyStore};

/// Build the policy encryption component for `config`
///
/// # Errors
/// Returns `KeywardError::Config` if the configured store cannot be built.
pub fn build_policy_encryption(config: &KeywardConfig) -> Result<PolicyEncryption> {
    let store = build_store(&config.store)?;
    Ok(PolicyEncryption::new(store, config))
}
