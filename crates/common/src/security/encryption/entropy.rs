//! Cryptographically secure random source
//!
//! Key and IV generation draw from an [`EntropySource`] so a failing
//! operating-system RNG surfaces as an error rather than a weaker fallback.

use rand::rngs::OsRng;
use rand::RngCore;

use super::keys::{KeyMaterialError, KeyMaterialResult};

/// Source of cryptographically secure random bytes
///
/// Implementations must either fill the whole buffer with CSPRNG output or
/// return an error.
pub trait EntropySource: Send + Sync {
    /// Fill `dest` with random bytes.
    ///
    /// # Errors
    /// Returns `KeyMaterialError::EntropyUnavailable` when the source cannot
    /// produce randomness.
    fn fill(&self, dest: &mut [u8]) -> KeyMaterialResult<()>;
}

/// Operating-system CSPRNG (`getrandom`)
#[derive(Debug, Default, Clone, Copy)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&self, dest: &mut [u8]) -> KeyMaterialResult<()> {
        OsRng
            .try_fill_bytes(dest)
            .map_err(|e| KeyMaterialError::EntropyUnavailable(e.to_string()))
    }
}
