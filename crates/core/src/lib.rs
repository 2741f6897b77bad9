//! # Keyward Core
//!
//! Key custody and IV custody logic - no infrastructure dependencies.
//!
//! This crate contains:
//! - The persistent key store port (trait)
//! - Per-cluster key provisioning (get-or-create with race tolerance)
//! - Initialization vector pinning through document metadata
//! - The `PolicyEncryption` facade a reconciler owns
//!
//! ## Architecture Principles
//! - Only depends on `keyward-common` and `keyward-domain`
//! - No store, file or network code
//! - All external dependencies via traits

mod errors;
pub mod iv;
pub mod policy_encryption;
pub mod provisioning;

// Re-export specific items to avoid ambiguity
pub use iv::{InitializationVectorManager, IvResolution};
pub use policy_encryption::{EncryptionMaterial, PolicyEncryption};
pub use provisioning::ports::KeyRecordStore;
pub use provisioning::{CreateOutcome, KeyOrigin, KeyProvisioner, ResolvedKey};
