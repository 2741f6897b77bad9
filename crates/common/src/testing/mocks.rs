//! Mock implementations of entropy sources
//!
//! Provides deterministic and failing random sources for testing the
//! generation paths of keys and IVs.

// Allow missing error/panic docs for test mocks - they are designed to be simple
// and errors are clearly indicated by their return types
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::security::encryption::{EntropySource, KeyMaterialError, KeyMaterialResult};

/// Deterministic source producing a running byte counter
///
/// Each call continues where the previous one stopped, so consecutive keys
/// differ while staying predictable.
///
/// # Examples
///
/// ```
/// use keyward_common::testing::mocks::SequentialEntropy;
/// use keyward_common::EntropySource;
///
/// let entropy = SequentialEntropy::new();
/// let mut buf = [0u8; 4];
/// entropy.fill(&mut buf).unwrap();
/// assert_eq!(buf, [0, 1, 2, 3]);
/// entropy.fill(&mut buf).unwrap();
/// assert_eq!(buf, [4, 5, 6, 7]);
/// assert_eq!(entropy.calls(), 2);
/// ```
#[derive(Debug, Default)]
pub struct SequentialEntropy {
    next: AtomicUsize,
    calls: AtomicUsize,
}

impl SequentialEntropy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `fill` calls served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl EntropySource for SequentialEntropy {
    fn fill(&self, dest: &mut [u8]) -> KeyMaterialResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let start = self.next.fetch_add(dest.len(), Ordering::SeqCst);
        for (offset, byte) in dest.iter_mut().enumerate() {
            *byte = ((start + offset) % 256) as u8;
        }
        Ok(())
    }
}

/// Source that always reports exhausted entropy
#[derive(Debug, Default)]
pub struct FailingEntropy {
    attempts: AtomicUsize,
}

impl FailingEntropy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times generation was attempted.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl EntropySource for FailingEntropy {
    fn fill(&self, _dest: &mut [u8]) -> KeyMaterialResult<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(KeyMaterialError::EntropyUnavailable("simulated entropy exhaustion".to_string()))
    }
}
