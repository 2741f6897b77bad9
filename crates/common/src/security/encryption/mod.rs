//! Encryption key material and caching
//!
//! This module provides the **custody** side of policy encryption. It never
//! encrypts anything itself; the templating engine consumes the key and IV
//! material produced here.
//!
//! ## Features
//!
//! - **Key Material**: 256-bit keys and 128-bit IVs with enforced lengths
//! - **Entropy**: pluggable CSPRNG source that fails instead of degrading
//! - **Key Caching**: thread-safe per-cluster memoization of resolved keys

#[cfg(feature = "runtime")]
pub mod cache;
pub mod entropy;
pub mod keys;

// Re-export commonly used types
#[cfg(feature = "runtime")]
pub use cache::{CacheStats, EncryptionKeyCache};
pub use entropy::{EntropySource, OsEntropy};
pub use keys::{
    EncryptionKey, InitializationVector, KeyMaterialError, KeyMaterialResult, IV_SIZE, KEY_SIZE,
};
