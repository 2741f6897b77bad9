//! Encryption key and initialization vector material
//!
//! Fixed-size byte containers whose lengths match what the templating engine
//! expects: AES-256 keys and 128-bit IVs.

use std::fmt;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use sha2::{Digest, Sha256};
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::entropy::EntropySource;

/// Encryption key length in bytes (256 bits)
pub const KEY_SIZE: usize = 32;

/// Initialization vector length in bytes (128 bits)
pub const IV_SIZE: usize = 16;

// Number of digest bytes shown by `EncryptionKey::fingerprint`
const FINGERPRINT_BYTES: usize = 8;

/// Errors raised while producing or decoding key material
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyMaterialError {
    #[error("entropy source unavailable: {0}")]
    EntropyUnavailable(String),

    #[error("{kind} must be exactly {expected} bytes, got {actual}")]
    InvalidLength { kind: &'static str, expected: usize, actual: usize },

    #[error("invalid base64 encoding: {0}")]
    InvalidEncoding(String),
}

/// Result type alias for key material operations
pub type KeyMaterialResult<T> = Result<T, KeyMaterialError>;

/// 256-bit symmetric key for one managed cluster
///
/// Memory is zeroed on drop and `Debug` never prints the bytes. Equality is
/// evaluated in constant time.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct EncryptionKey([u8; KEY_SIZE]);

impl EncryptionKey {
    /// Generate a fresh key from `source`
    ///
    /// # Errors
    /// Returns `KeyMaterialError::EntropyUnavailable` if the source fails.
    pub fn generate(source: &dyn EntropySource) -> KeyMaterialResult<Self> {
        let mut bytes = [0u8; KEY_SIZE];
        source.fill(&mut bytes)?;
        let key = Self(bytes);
        bytes.zeroize();
        Ok(key)
    }

    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Copy a key out of a slice, typically a persisted record field
    ///
    /// # Errors
    /// Returns `KeyMaterialError::InvalidLength` unless `bytes` is exactly
    /// [`KEY_SIZE`] long.
    pub fn from_slice(bytes: &[u8]) -> KeyMaterialResult<Self> {
        let array: [u8; KEY_SIZE] = bytes.try_into().map_err(|_| {
            KeyMaterialError::InvalidLength {
                kind: "encryption key",
                expected: KEY_SIZE,
                actual: bytes.len(),
            }
        })?;
        Ok(Self(array))
    }

    /// Expose the raw key bytes (use with caution)
    ///
    /// The exposed value should not be stored or logged.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Short SHA-256 fingerprint that identifies a key in logs.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.0);
        hex::encode(&digest[..FINGERPRINT_BYTES])
    }
}

impl PartialEq for EncryptionKey {
    fn eq(&self, other: &Self) -> bool {
        constant_time_eq(&self.0, &other.0)
    }
}

impl Eq for EncryptionKey {}

impl fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EncryptionKey(fingerprint={})", self.fingerprint())
    }
}

/// 128-bit initialization vector pinned to one (policy, cluster) pair
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct InitializationVector([u8; IV_SIZE]);

impl InitializationVector {
    /// Generate a fresh IV from `source`
    ///
    /// # Errors
    /// Returns `KeyMaterialError::EntropyUnavailable` if the source fails.
    pub fn generate(source: &dyn EntropySource) -> KeyMaterialResult<Self> {
        let mut bytes = [0u8; IV_SIZE];
        source.fill(&mut bytes)?;
        Ok(Self(bytes))
    }

    pub fn from_bytes(bytes: [u8; IV_SIZE]) -> Self {
        Self(bytes)
    }

    /// # Errors
    /// Returns `KeyMaterialError::InvalidLength` unless `bytes` is exactly
    /// [`IV_SIZE`] long.
    pub fn from_slice(bytes: &[u8]) -> KeyMaterialResult<Self> {
        let array: [u8; IV_SIZE] =
            bytes.try_into().map_err(|_| KeyMaterialError::InvalidLength {
                kind: "initialization vector",
                expected: IV_SIZE,
                actual: bytes.len(),
            })?;
        Ok(Self(array))
    }

    /// Decode the standard base64 form stored in document metadata
    ///
    /// ASCII line breaks (`\r`, `\n`) are skipped anywhere in the input, so
    /// an annotation written as a YAML block scalar still decodes.
    ///
    /// # Errors
    /// Returns `KeyMaterialError::InvalidEncoding` for text that is not
    /// standard base64 and `KeyMaterialError::InvalidLength` when the decoded
    /// value is not [`IV_SIZE`] bytes.
    pub fn from_base64(encoded: &str) -> KeyMaterialResult<Self> {
        let compact: Vec<u8> =
            encoded.bytes().filter(|b| !matches!(b, b'\r' | b'\n')).collect();
        let decoded = BASE64
            .decode(&compact)
            .map_err(|e| KeyMaterialError::InvalidEncoding(e.to_string()))?;
        Self::from_slice(&decoded)
    }

    pub fn to_base64(&self) -> String {
        BASE64.encode(self.0)
    }

    pub fn as_bytes(&self) -> &[u8; IV_SIZE] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl fmt::Debug for InitializationVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InitializationVector({})", self.to_base64())
    }
}

/// Constant-time comparison to prevent timing attacks
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }

    result == 0
}

#[cfg(test)]
mod tests {
    //! Unit tests for security::encryption::keys.
    use std::collections::HashSet;

    use super::*;
    use crate::security::encryption::OsEntropy;

    struct BrokenEntropy;

    impl EntropySource for BrokenEntropy {
        fn fill(&self, _dest: &mut [u8]) -> KeyMaterialResult<()> {
            Err(KeyMaterialError::EntropyUnavailable("no entropy".into()))
        }
    }

    /// Validates the generated key length scenario.
    ///
    /// Assertions:
    /// - Confirms `key.len()` equals `32`.
    #[test]
    fn test_key_length() {
        let key = EncryptionKey::generate(&OsEntropy).unwrap();
        assert_eq!(key.len(), 32);
        assert_eq!(key.as_bytes().len(), KEY_SIZE);
    }

    /// Validates `HashSet::new` behavior for the key randomness scenario.
    ///
    /// Assertions:
    /// - Confirms `keys.len()` equals `10`.
    #[test]
    fn test_key_randomness() {
        let mut keys = HashSet::new();
        for _ in 0..10 {
            keys.insert(*EncryptionKey::generate(&OsEntropy).unwrap().as_bytes());
        }
        assert_eq!(keys.len(), 10, "Keys are not random");
    }

    /// Validates the failing entropy scenario.
    ///
    /// Assertions:
    /// - Ensures both key and IV generation surface `EntropyUnavailable`.
    #[test]
    fn test_entropy_failure_is_surfaced() {
        assert!(matches!(
            EncryptionKey::generate(&BrokenEntropy),
            Err(KeyMaterialError::EntropyUnavailable(_))
        ));
        assert!(matches!(
            InitializationVector::generate(&BrokenEntropy),
            Err(KeyMaterialError::EntropyUnavailable(_))
        ));
    }

    #[test]
    fn test_key_from_slice_enforces_length() {
        assert!(EncryptionKey::from_slice(&[1u8; 32]).is_ok());
        assert_eq!(
            EncryptionKey::from_slice(&[1u8; 31]).unwrap_err(),
            KeyMaterialError::InvalidLength { kind: "encryption key", expected: 32, actual: 31 }
        );
        assert!(EncryptionKey::from_slice(&[]).is_err());
    }

    /// Validates that `Debug` output does not leak key bytes.
    ///
    /// Assertions:
    /// - Ensures the fingerprint is 16 hex characters.
    /// - Ensures the debug string contains the fingerprint only.
    #[test]
    fn test_key_debug_redacted() {
        let key = EncryptionKey::from_bytes([0xAB; KEY_SIZE]);
        let debug = format!("{key:?}");

        assert_eq!(key.fingerprint().len(), 16);
        assert_eq!(debug, format!("EncryptionKey(fingerprint={})", key.fingerprint()));
        assert!(!debug.to_lowercase().contains("abab"));
    }

    #[test]
    fn test_key_equality() {
        let a = EncryptionKey::from_bytes([1; KEY_SIZE]);
        let b = EncryptionKey::from_bytes([1; KEY_SIZE]);
        let c = EncryptionKey::from_bytes([2; KEY_SIZE]);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn test_iv_known_base64_value() {
        let iv = InitializationVector::from_base64("7cznVUq5SXEE4RMZNkGOrQ==").unwrap();
        assert_eq!(iv.len(), 16);
        assert_eq!(iv.to_base64(), "7cznVUq5SXEE4RMZNkGOrQ==");
    }

    #[test]
    fn test_iv_ignores_line_breaks() {
        let expected = InitializationVector::from_base64("7cznVUq5SXEE4RMZNkGOrQ==").unwrap();
        for encoded in ["7cznVUq5SXEE4RMZNkGOrQ==\n", "7cznVUq5SXEE\r\n4RMZNkGOrQ==\r\n"] {
            assert_eq!(InitializationVector::from_base64(encoded).unwrap(), expected, "{encoded:?}");
        }
        // Other whitespace is still rejected
        assert!(InitializationVector::from_base64(" 7cznVUq5SXEE4RMZNkGOrQ==").is_err());
    }

    #[test]
    fn test_iv_rejects_invalid_text() {
        assert!(matches!(
            InitializationVector::from_base64("this-is-invalid"),
            Err(KeyMaterialError::InvalidEncoding(_))
        ));
        // Valid base64, but 3 bytes long
        assert!(matches!(
            InitializationVector::from_base64("QUJD"),
            Err(KeyMaterialError::InvalidLength { expected: 16, actual: 3, .. })
        ));
    }

    #[test]
    fn test_generated_iv_is_sixteen_bytes() {
        let iv = InitializationVector::generate(&OsEntropy).unwrap();
        assert_eq!(iv.as_bytes().len(), IV_SIZE);
        assert_eq!(InitializationVector::from_base64(&iv.to_base64()).unwrap(), iv);
    }
}
