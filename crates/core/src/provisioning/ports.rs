//! Port interface for the persistent key store
//!
//! This trait defines the boundary between key provisioning and the durable
//! namespaced object store that is the source of truth for cluster keys.

use async_trait::async_trait;
use keyward_domain::{PersistedKeyRecord, RecordId, StoreResult};

/// Namespaced key-value object store holding persisted key records
///
/// Implementations must report a missing record as `StoreError::NotFound` and
/// a create against an existing identity as `StoreError::AlreadyExists`; the
/// provisioner relies on both to resolve the get-or-create race. Creation must
/// be atomic per identity: of two concurrent creates, exactly one succeeds.
#[async_trait]
pub trait KeyRecordStore: Send + Sync {
    /// Read the record at `id`
    async fn get(&self, id: &RecordId) -> StoreResult<PersistedKeyRecord>;

    /// Create `record`, failing if its identity is already taken
    async fn create(&self, record: &PersistedKeyRecord) -> StoreResult<()>;
}
