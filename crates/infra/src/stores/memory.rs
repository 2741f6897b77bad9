//! Process-local key record store
//!
//! Records are keyed by their full `RecordId`. Clones share the same map, so two
//! provisioners built from clones of one store behave like two replicas
//! talking to one backend.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use keyward_core::KeyRecordStore;
use keyward_domain::{PersistedKeyRecord, RecordId, StoreError, StoreResult};
use parking_lot::Mutex;
use tracing::debug;

#[derive(Clone, Default)]
pub struct InMemoryKeyStore {
    records: Arc<Mutex<HashMap<RecordId, PersistedKeyRecord>>>,
}

impl InMemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

#[async_trait]
impl KeyRecordStore for InMemoryKeyStore {
    async fn get(&self, id: &RecordId) -> StoreResult<PersistedKeyRecord> {
        self.records
            .lock()
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(&id.namespace, &id.name))
    }

    async fn create(&self, record: &PersistedKeyRecord) -> StoreResult<()> {
        let id = record.id();
        let mut guard = self.records.lock();
        if guard.contains_key(&id) {
            return Err(StoreError::already_exists(id.namespace, id.name));
        }
        debug!(record = %id, fields = record.data.len(), "persisting key record");
        guard.insert(id, record.clone());
        Ok(())
    }
}
