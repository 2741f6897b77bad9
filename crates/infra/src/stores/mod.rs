//! Key record store adapters
//!
//! Implementations of `keyward_core::KeyRecordStore`:
//! - [`InMemoryKeyStore`]: process-local map for tests and single-process use
//! - [`FileKeyStore`]: one JSON document per record under a root directory

pub mod file;
pub mod memory;

use std::sync::Arc;

use keyward_core::KeyRecordStore;
use keyward_domain::{KeywardError, Result, StoreBackend, StoreConfig};
use tracing::info;

pub use file::FileKeyStore;
pub use memory::InMemoryKeyStore;

/// Build the store selected by `config`
///
/// # Errors
/// Returns `KeywardError::Config` when the file backend has no root directory.
pub fn build_store(config: &StoreConfig) -> Result<Arc<dyn KeyRecordStore>> {
    match config.backend {
        StoreBackend::Memory => {
            info!(backend = %config.backend, "Using in-memory key store");
            Ok(Arc::new(InMemoryKeyStore::new()))
        }
        StoreBackend::File => {
            let root = config.root.as_ref().ok_or_else(|| {
                KeywardError::Config("store.root is required for the file backend".to_string())
            })?;
            info!(backend = %config.backend, root = %root.display(), "Using file key store");
            Ok(Arc::new(FileKeyStore::new(root.clone())))
        }
    }
}
