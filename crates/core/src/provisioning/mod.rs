//! Per-cluster encryption key provisioning
//!
//! Resolves the key of a managed cluster through the cache, then the
//! persistent store, creating and persisting a fresh key the first time a
//! cluster needs one.

pub mod ports;
pub mod service;

pub use ports::KeyRecordStore;
pub use service::{CreateOutcome, KeyOrigin, KeyProvisioner, ResolvedKey};
