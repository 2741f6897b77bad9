//! Policy encryption material - the component a reconciler owns
//!
//! Wires the key provisioner and the IV manager behind one handle that is
//! constructed once at reconciler start and shared by its workers.

use std::sync::Arc;

use keyward_common::{EncryptionKey, EncryptionKeyCache, EntropySource, InitializationVector};
use keyward_domain::{Annotations, ClusterId, KeywardConfig, Result};
use tracing::instrument;

use crate::iv::InitializationVectorManager;
use crate::provisioning::{KeyProvisioner, KeyRecordStore};

/// Key and IV handed to the templating engine for one (policy, cluster) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptionMaterial {
    pub key: EncryptionKey,
    pub iv: InitializationVector,
}

/// Key custody and IV custody for policy templates
pub struct PolicyEncryption {
    provisioner: KeyProvisioner,
    iv_manager: InitializationVectorManager,
}

impl PolicyEncryption {
    /// Create the component with a fresh, empty key cache
    pub fn new(store: Arc<dyn KeyRecordStore>, config: &KeywardConfig) -> Self {
        Self::with_cache(store, Arc::new(EncryptionKeyCache::new()), config)
    }

    /// Create the component around an existing key cache
    pub fn with_cache(
        store: Arc<dyn KeyRecordStore>,
        cache: Arc<EncryptionKeyCache>,
        config: &KeywardConfig,
    ) -> Self {
        Self {
            provisioner: KeyProvisioner::new(store, cache, &config.provisioning),
            iv_manager: InitializationVectorManager::new(&config.iv),
        }
    }

    /// Replace the random source for both keys and IVs
    pub fn with_entropy(self, entropy: Arc<dyn EntropySource>) -> Self {
        Self {
            provisioner: self.provisioner.with_entropy(Arc::clone(&entropy)),
            iv_manager: self.iv_manager.with_entropy(entropy),
        }
    }

    pub fn cache(&self) -> &Arc<EncryptionKeyCache> {
        self.provisioner.cache()
    }

    pub fn provisioner(&self) -> &KeyProvisioner {
        &self.provisioner
    }

    pub fn iv_manager(&self) -> &InitializationVectorManager {
        &self.iv_manager
    }

    /// Get the encryption key for `cluster`, creating it on first use
    pub async fn encryption_key(&self, cluster: &ClusterId) -> Result<EncryptionKey> {
        self.provisioner.get_encryption_key(cluster).await
    }

    /// Get the IV pinned for `policy` in `metadata`, pinning one if needed
    pub fn initialization_vector(
        &self,
        policy: &str,
        cluster: &ClusterId,
        metadata: &mut Annotations,
    ) -> Result<InitializationVector> {
        self.iv_manager.get_initialization_vector(policy, cluster, metadata)
    }

    /// Resolve key and IV for one policy replicated to `cluster`
    ///
    /// The key is resolved first, so a store failure leaves `metadata`
    /// untouched.
    #[instrument(skip_all, fields(policy = %policy, cluster = %cluster))]
    pub async fn material_for(
        &self,
        policy: &str,
        cluster: &ClusterId,
        metadata: &mut Annotations,
    ) -> Result<EncryptionMaterial> {
        let key = self.encryption_key(cluster).await?;
        let iv = self.initialization_vector(policy, cluster, metadata)?;
        Ok(EncryptionMaterial { key, iv })
    }
}
