//! Key provisioning service - get-or-create against the persistent store

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use keyward_common::{EncryptionKey, EncryptionKeyCache, EntropySource, OsEntropy};
use keyward_domain::{
    ClusterId, KeywardError, PersistedKeyRecord, ProvisioningConfig, RecordId, Result,
    StoreError, StoreResult,
};
use tracing::{debug, info, instrument, warn};

use super::ports::KeyRecordStore;
use crate::errors::from_material;

/// Result of attempting to create a key record
///
/// The create call is branched on exactly once: losing the race to another
/// writer is an expected outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    /// Our record was persisted
    Created,
    /// Another writer persisted a record with the same identity first
    AlreadyExisted,
    /// Any other store failure
    Failed(StoreError),
}

impl From<StoreResult<()>> for CreateOutcome {
    fn from(result: StoreResult<()>) -> Self {
        match result {
            Ok(()) => Self::Created,
            Err(StoreError::AlreadyExists { .. }) => Self::AlreadyExisted,
            Err(err) => Self::Failed(err),
        }
    }
}

/// Where a resolved key came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOrigin {
    /// Served from the in-process cache without touching the store
    Cache,
    /// Read from an existing persisted record
    Store,
    /// Generated here and persisted by this call
    Created,
    /// Generated here, but a concurrent writer won; the stored key was adopted
    Adopted,
}

/// A cluster key together with its origin
#[derive(Debug, Clone)]
pub struct ResolvedKey {
    pub key: EncryptionKey,
    pub origin: KeyOrigin,
}

/// Resolves per-cluster encryption keys with get-or-create semantics
///
/// The store is the single source of truth; the cache is only populated after
/// a confirmed read or create, so a failed or cancelled call leaves no trace
/// in process state and can simply be retried.
pub struct KeyProvisioner {
    store: Arc<dyn KeyRecordStore>,
    cache: Arc<EncryptionKeyCache>,
    entropy: Arc<dyn EntropySource>,
    secret_name: String,
    key_field: String,
    store_timeout: Duration,
}

impl KeyProvisioner {
    /// Create a provisioner drawing keys from the operating-system CSPRNG
    pub fn new(
        store: Arc<dyn KeyRecordStore>,
        cache: Arc<EncryptionKeyCache>,
        config: &ProvisioningConfig,
    ) -> Self {
        Self {
            store,
            cache,
            entropy: Arc::new(OsEntropy),
            secret_name: config.secret_name.clone(),
            key_field: config.key_field.clone(),
            store_timeout: config.store_timeout(),
        }
    }

    /// Replace the random source used for new keys
    pub fn with_entropy(mut self, entropy: Arc<dyn EntropySource>) -> Self {
        self.entropy = entropy;
        self
    }

    pub fn cache(&self) -> &Arc<EncryptionKeyCache> {
        &self.cache
    }

    /// Location of the key record for `cluster`
    pub fn record_id(&self, cluster: &ClusterId) -> RecordId {
        RecordId::for_cluster(cluster, self.secret_name.as_str())
    }

    /// Get the encryption key for `cluster`, creating it on first use
    ///
    /// # Errors
    /// - `KeywardError::Store` with the store's error, unmodified, for any
    ///   failure other than not-found on read or already-exists on create
    /// - `KeywardError::Entropy` when no key could be generated
    /// - `KeywardError::InvalidKeyRecord` when the persisted record does not
    ///   hold a 32-byte key
    pub async fn get_encryption_key(&self, cluster: &ClusterId) -> Result<EncryptionKey> {
        self.resolve_encryption_key(cluster).await.map(|resolved| resolved.key)
    }

    /// Same as [`Self::get_encryption_key`], also reporting where the key came from
    #[instrument(skip_all, fields(cluster = %cluster))]
    pub async fn resolve_encryption_key(&self, cluster: &ClusterId) -> Result<ResolvedKey> {
        if let Some(key) = self.cache.get(cluster.as_str()) {
            debug!("Encryption key served from cache");
            return Ok(ResolvedKey { key, origin: KeyOrigin::Cache });
        }

        let id = self.record_id(cluster);
        let resolved = match self.read_key(&id).await {
            Ok(key) => {
                info!(fingerprint = %key.fingerprint(), "Loaded existing encryption key");
                ResolvedKey { key, origin: KeyOrigin::Store }
            }
            Err(KeywardError::Store(StoreError::NotFound { .. })) => {
                debug!(record = %id, "No encryption key record, generating one");
                self.create_key(&id).await?
            }
            Err(err) => {
                warn!(
                    error = %err,
                    error_kind = err.label(),
                    record = %id,
                    "Failed to read encryption key record"
                );
                return Err(err);
            }
        };

        self.cache.set(cluster.as_str(), resolved.key.clone());
        Ok(resolved)
    }

    async fn create_key(&self, id: &RecordId) -> Result<ResolvedKey> {
        let generated = EncryptionKey::generate(self.entropy.as_ref()).map_err(from_material)?;
        let record = PersistedKeyRecord::new(id.clone())
            .with_field(self.key_field.as_str(), generated.as_bytes().to_vec());

        match CreateOutcome::from(self.bounded(self.store.create(&record)).await) {
            CreateOutcome::Created => {
                info!(fingerprint = %generated.fingerprint(), record = %id, "Created encryption key");
                Ok(ResolvedKey { key: generated, origin: KeyOrigin::Created })
            }
            CreateOutcome::AlreadyExisted => {
                info!(record = %id, "Encryption key created concurrently, adopting stored key");
                let key = self.read_key(id).await?;
                Ok(ResolvedKey { key, origin: KeyOrigin::Adopted })
            }
            CreateOutcome::Failed(err) => {
                let err = KeywardError::from(err);
                warn!(
                    error = %err,
                    error_kind = err.label(),
                    record = %id,
                    "Failed to persist encryption key"
                );
                Err(err)
            }
        }
    }

    async fn read_key(&self, id: &RecordId) -> Result<EncryptionKey> {
        let record = self.bounded(self.store.get(id)).await?;
        let bytes = record.field(&self.key_field).ok_or_else(|| {
            KeywardError::InvalidKeyRecord(format!("{id} has no `{}` field", self.key_field))
        })?;
        EncryptionKey::from_slice(bytes)
            .map_err(|e| KeywardError::InvalidKeyRecord(format!("{id}: {e}")))
    }

    /// Apply the configured store timeout; a zero timeout leaves calls unbounded.
    async fn bounded<T, F>(&self, call: F) -> StoreResult<T>
    where
        F: Future<Output = StoreResult<T>>,
    {
        if self.store_timeout.is_zero() {
            return call.await;
        }
        tokio::time::timeout(self.store_timeout, call)
            .await
            .map_err(|_| StoreError::Timeout { elapsed: self.store_timeout })?
    }
}
