//! Store doubles implementing `KeyRecordStore`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use keyward_core::KeyRecordStore;
use keyward_domain::{PersistedKeyRecord, RecordId, StoreError, StoreResult};
use parking_lot::Mutex;
use tokio::sync::Barrier;

/// In-memory store with atomic create and call counters.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<RecordId, PersistedKeyRecord>>,
    gets: AtomicUsize,
    creates: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record before the test runs.
    pub fn with_record(self, record: PersistedKeyRecord) -> Self {
        self.records.lock().insert(record.id(), record);
        self
    }

    /// Direct read that bypasses the counters.
    pub fn record(&self, id: &RecordId) -> Option<PersistedKeyRecord> {
        self.records.lock().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn creates(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeyRecordStore for MemoryStore {
    async fn get(&self, id: &RecordId) -> StoreResult<PersistedKeyRecord> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.records
            .lock()
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(&id.namespace, &id.name))
    }

    async fn create(&self, record: &PersistedKeyRecord) -> StoreResult<()> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        let mut records = self.records.lock();
        let id = record.id();
        if records.contains_key(&id) {
            return Err(StoreError::already_exists(id.namespace, id.name));
        }
        records.insert(id, record.clone());
        Ok(())
    }
}

/// Store where another writer always wins the first create.
///
/// The first `create` persists `winner` under the requested identity and
/// reports `AlreadyExists`, as if a concurrent reconciliation got there first.
pub struct RacingStore {
    inner: MemoryStore,
    winner: Vec<u8>,
    raced: AtomicUsize,
}

impl RacingStore {
    pub fn new(winner: Vec<u8>) -> Self {
        Self { inner: MemoryStore::new(), winner, raced: AtomicUsize::new(0) }
    }

    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }
}

#[async_trait]
impl KeyRecordStore for RacingStore {
    async fn get(&self, id: &RecordId) -> StoreResult<PersistedKeyRecord> {
        self.inner.get(id).await
    }

    async fn create(&self, record: &PersistedKeyRecord) -> StoreResult<()> {
        if self.raced.fetch_add(1, Ordering::SeqCst) == 0 {
            let winner =
                PersistedKeyRecord::new(record.id()).with_field("key", self.winner.clone());
            self.inner.create(&winner).await?;
        }
        self.inner.create(record).await
    }
}

/// Store whose reads park until `parties` callers have all missed.
///
/// Forces every caller onto the create path at the same time.
pub struct GatedStore {
    inner: Arc<MemoryStore>,
    barrier: Barrier,
    parties: usize,
    arrivals: AtomicUsize,
}

impl GatedStore {
    pub fn new(inner: Arc<MemoryStore>, parties: usize) -> Self {
        Self { inner, barrier: Barrier::new(parties), parties, arrivals: AtomicUsize::new(0) }
    }
}

#[async_trait]
impl KeyRecordStore for GatedStore {
    async fn get(&self, id: &RecordId) -> StoreResult<PersistedKeyRecord> {
        let result = self.inner.get(id).await;
        if self.arrivals.fetch_add(1, Ordering::SeqCst) < self.parties {
            self.barrier.wait().await;
        }
        result
    }

    async fn create(&self, record: &PersistedKeyRecord) -> StoreResult<()> {
        self.inner.create(record).await
    }
}

/// Store failing every call with scripted errors.
pub struct FailingStore {
    get_error: StoreError,
    create_error: Option<StoreError>,
    calls: AtomicUsize,
}

impl FailingStore {
    /// Fail reads with `get_error`; creates succeed unless configured.
    pub fn on_get(get_error: StoreError) -> Self {
        Self { get_error, create_error: None, calls: AtomicUsize::new(0) }
    }

    /// Reads report not-found and creates fail with `create_error`.
    pub fn on_create(create_error: StoreError) -> Self {
        Self {
            get_error: StoreError::not_found("", ""),
            create_error: Some(create_error),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeyRecordStore for FailingStore {
    async fn get(&self, id: &RecordId) -> StoreResult<PersistedKeyRecord> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.get_error {
            StoreError::NotFound { .. } => Err(StoreError::not_found(&id.namespace, &id.name)),
            other => Err(other.clone()),
        }
    }

    async fn create(&self, _record: &PersistedKeyRecord) -> StoreResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.create_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

/// Store that answers only after `delay`.
pub struct SlowStore {
    inner: MemoryStore,
    delay: Duration,
}

impl SlowStore {
    pub fn new(delay: Duration) -> Self {
        Self { inner: MemoryStore::new(), delay }
    }
}

#[async_trait]
impl KeyRecordStore for SlowStore {
    async fn get(&self, id: &RecordId) -> StoreResult<PersistedKeyRecord> {
        tokio::time::sleep(self.delay).await;
        self.inner.get(id).await
    }

    async fn create(&self, record: &PersistedKeyRecord) -> StoreResult<()> {
        tokio::time::sleep(self.delay).await;
        self.inner.create(record).await
    }
}
