//! Per-cluster key caching for performance optimization
//!
//! Provides thread-safe memoization of resolved encryption keys so repeated
//! reconciliations of the same cluster never go back to the persistent store.
//!
//! The cache is a disposable replica: it starts empty on every process start
//! and is rehydrated from the store on demand. It is owned by the component
//! that constructs it (typically the reconciler) and passed around as an
//! explicit dependency; there is no process-wide instance.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tracing::{debug, warn};

use super::keys::EncryptionKey;

/// Concurrency-safe mapping from cluster identifier to key bytes
///
/// Reads and writes are serialized through one lock scoped to the whole
/// mapping. Critical sections only clone or insert a 32-byte value.
#[derive(Debug, Default)]
pub struct EncryptionKeyCache {
    entries: Mutex<HashMap<String, EncryptionKey>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl EncryptionKeyCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the cached key for `cluster`
    ///
    /// Returns a private copy; callers can never mutate the cached entry.
    /// Never touches the persistent store.
    pub fn get(&self, cluster: &str) -> Option<EncryptionKey> {
        let found = self.entries.lock().get(cluster).cloned();

        match found {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };

        found
    }

    /// Insert or overwrite the cached key for `cluster`
    ///
    /// Overwriting with the same bytes is a no-op in effect. Overwriting with
    /// different bytes is permitted but logged, since a persisted key is never
    /// expected to change.
    pub fn set(&self, cluster: impl Into<String>, key: EncryptionKey) {
        let cluster = cluster.into();
        let fingerprint = key.fingerprint();
        let previous = self.entries.lock().insert(cluster.clone(), key);

        match previous {
            Some(old) if old.fingerprint() != fingerprint => {
                warn!(
                    cluster = %cluster,
                    previous = %old.fingerprint(),
                    current = %fingerprint,
                    "Cached encryption key replaced with different material"
                );
            }
            Some(_) => {}
            None => debug!(cluster = %cluster, fingerprint = %fingerprint, "Encryption key cached"),
        }
    }

    /// Whether a key is cached for `cluster` (does not count as a hit or miss).
    pub fn contains(&self, cluster: &str) -> bool {
        self.entries.lock().contains_key(cluster)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Get cache statistics
    ///
    /// Useful for monitoring and diagnostics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of cache usage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    /// Hit rate as a percentage (0.0 to 100.0); 0.0 before any lookup.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            return 0.0;
        }
        (self.hits as f64 / total as f64) * 100.0
    }
}
