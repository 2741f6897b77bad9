//! Key material primitives shared across Keyward crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: key and IV types, entropy source, encoding helpers
//! - `runtime`: the concurrent per-cluster key cache
//! - `observability`: tracing for cache events (implied by `runtime`)
//! - `test-utils`: deterministic and failing entropy sources for tests

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

#[cfg(feature = "foundation")]
pub mod security;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(feature = "test-utils")]
pub mod testing;

// Re-export commonly used types
// ------------------------
#[cfg(feature = "runtime")]
pub use security::encryption::{CacheStats, EncryptionKeyCache};
#[cfg(feature = "foundation")]
pub use security::encryption::{
    EncryptionKey, EntropySource, InitializationVector, KeyMaterialError, KeyMaterialResult,
    OsEntropy, IV_SIZE, KEY_SIZE,
};
