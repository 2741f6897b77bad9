//! File-backed key record store
//!
//! Layout: `<root>/<namespace>/<name>.json`, one JSON document per record.
//!
//! Creation writes the full document to a private temp file and then
//! hard-links it into place. The link fails if the target exists, so racing
//! writers (threads or processes sharing the directory) resolve to
//! first-writer-wins and readers never observe a partially written record.
//! The parent directory is synced after the link so the new entry is durable.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use keyward_core::KeyRecordStore;
use keyward_domain::{PersistedKeyRecord, RecordId, StoreError, StoreResult};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::errors::IntoStoreError;

const RECORD_EXTENSION: &str = "json";

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone)]
pub struct FileKeyStore {
    root: PathBuf,
}

impl FileKeyStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the document holding `id`.
    ///
    /// # Errors
    /// Returns `StoreError::Backend` when the namespace or name cannot be used
    /// as a single path component.
    pub fn record_path(&self, id: &RecordId) -> StoreResult<PathBuf> {
        validate_component(&id.namespace, id)?;
        validate_component(&id.name, id)?;
        Ok(self.root.join(&id.namespace).join(format!("{}.{RECORD_EXTENSION}", id.name)))
    }

    fn temp_path(&self, id: &RecordId) -> PathBuf {
        let seq = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        self.root
            .join(&id.namespace)
            .join(format!(".{}.{}.{seq}.tmp", id.name, std::process::id()))
    }
}

#[async_trait]
impl KeyRecordStore for FileKeyStore {
    async fn get(&self, id: &RecordId) -> StoreResult<PersistedKeyRecord> {
        let path = self.record_path(id)?;
        let contents = fs::read(&path).await.map_err(|e| e.into_store_error(id))?;
        let record: PersistedKeyRecord =
            serde_json::from_slice(&contents).map_err(|e| e.into_store_error(id))?;

        if record.id() != *id {
            return Err(StoreError::backend(format!(
                "key record at {} belongs to {}",
                path.display(),
                record.id()
            )));
        }
        Ok(record)
    }

    async fn create(&self, record: &PersistedKeyRecord) -> StoreResult<()> {
        let id = record.id();
        let path = self.record_path(&id)?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).await.map_err(|e| e.into_store_error(&id))?;
        }

        let body = serde_json::to_vec_pretty(record).map_err(|e| e.into_store_error(&id))?;
        let temp = self.temp_path(&id);
        let linked = write_then_link(&temp, &path, &body).await;

        if let Err(err) = fs::remove_file(&temp).await {
            if err.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %temp.display(), error = %err, "failed to remove temp key record");
            }
        }

        linked.map_err(|e| e.into_store_error(&id))?;
        debug!(record = %id, path = %path.display(), "persisted key record");
        Ok(())
    }
}

async fn write_then_link(temp: &Path, target: &Path, body: &[u8]) -> std::io::Result<()> {
    let mut file = fs::OpenOptions::new().write(true).create_new(true).open(temp).await?;
    file.write_all(body).await?;
    file.sync_all().await?;
    drop(file);
    fs::hard_link(temp, target).await?;
    match target.parent() {
        Some(dir) => sync_dir(dir).await,
        None => Ok(()),
    }
}

/// Flush a directory entry so a completed link survives a crash.
#[cfg(unix)]
async fn sync_dir(dir: &Path) -> std::io::Result<()> {
    fs::File::open(dir).await?.sync_all().await
}

#[cfg(not(unix))]
async fn sync_dir(_dir: &Path) -> std::io::Result<()> {
    Ok(())
}

fn validate_component(component: &str, id: &RecordId) -> StoreResult<()> {
    let invalid = component.is_empty()
        || component.starts_with('.')
        || component.contains(['/', '\\', '\0']);
    if invalid {
        return Err(StoreError::backend(format!(
            "{id}: `{component}` is not usable as a path component"
        )));
    }
    Ok(())
}
