//! Initialization vector manager

use std::sync::Arc;

use keyward_common::{EntropySource, InitializationVector, KeyMaterialError, OsEntropy};
use keyward_domain::{Annotations, ClusterId, IvConfig, Result};
use tracing::{debug, instrument, warn};

use crate::errors::from_material;

/// How an IV was obtained from document metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IvResolution {
    /// The annotation held a valid IV, returned unchanged
    Reused(InitializationVector),
    /// No annotation was present; a fresh IV was written
    Generated(InitializationVector),
    /// The annotation was undecodable or the wrong length and was overwritten
    Replaced { iv: InitializationVector, reason: KeyMaterialError },
}

impl IvResolution {
    pub fn iv(&self) -> InitializationVector {
        match self {
            Self::Reused(iv) | Self::Generated(iv) | Self::Replaced { iv, .. } => *iv,
        }
    }

    /// Whether the caller's metadata was modified and must be persisted.
    pub fn metadata_changed(&self) -> bool {
        !matches!(self, Self::Reused(_))
    }
}

/// Derives or validates the IV pinned in a document's metadata
///
/// Stateless apart from its random source: it never touches the key store or
/// the key cache.
pub struct InitializationVectorManager {
    entropy: Arc<dyn EntropySource>,
    annotation: String,
}

impl InitializationVectorManager {
    pub fn new(config: &IvConfig) -> Self {
        Self { entropy: Arc::new(OsEntropy), annotation: config.annotation.clone() }
    }

    /// Replace the random source used for new IVs
    pub fn with_entropy(mut self, entropy: Arc<dyn EntropySource>) -> Self {
        self.entropy = entropy;
        self
    }

    /// Metadata key holding the base64 IV
    pub fn annotation(&self) -> &str {
        &self.annotation
    }

    /// Return the IV pinned in `metadata`, pinning a new one if needed
    ///
    /// # Errors
    /// Returns `KeywardError::Entropy` if a new IV was needed and could not be
    /// generated; `metadata` is left untouched in that case.
    pub fn get_initialization_vector(
        &self,
        policy: &str,
        cluster: &ClusterId,
        metadata: &mut Annotations,
    ) -> Result<InitializationVector> {
        self.resolve_initialization_vector(policy, cluster, metadata).map(|r| r.iv())
    }

    /// Same as [`Self::get_initialization_vector`], reporting how the IV was obtained
    ///
    /// A malformed annotation is replaced rather than failing the call, and
    /// the replacement is logged at `warn` with the decode failure.
    #[instrument(skip_all, fields(policy = %policy, cluster = %cluster))]
    pub fn resolve_initialization_vector(
        &self,
        policy: &str,
        cluster: &ClusterId,
        metadata: &mut Annotations,
    ) -> Result<IvResolution> {
        let existing = metadata.get(&self.annotation).map(|v| InitializationVector::from_base64(v));

        let resolution = match existing {
            Some(Ok(iv)) => return Ok(IvResolution::Reused(iv)),
            None => {
                let iv = self.generate()?;
                debug!("Pinned new initialization vector");
                IvResolution::Generated(iv)
            }
            Some(Err(reason)) => {
                let iv = self.generate()?;
                warn!(
                    annotation = %self.annotation,
                    reason = %reason,
                    "Replaced malformed initialization vector annotation"
                );
                IvResolution::Replaced { iv, reason }
            }
        };

        metadata.insert(self.annotation.clone(), resolution.iv().to_base64());
        Ok(resolution)
    }

    fn generate(&self) -> Result<InitializationVector> {
        InitializationVector::generate(self.entropy.as_ref()).map_err(from_material)
    }
}
