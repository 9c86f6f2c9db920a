//! Keyed store for offline records.
//!
//! Operations are whole-record read/replace: concurrent access is
//! coordinated through the record's in-flight marker rather than
//! fine-grained locking.

use crate::error::{OfflineError, OfflineResult};
use crate::record::OfflineRecord;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::warn;

/// Keyed set of pending offline records.
#[async_trait]
pub trait OfflineStore: Send + Sync {
    /// Returns a snapshot of all records.
    async fn list(&self) -> OfflineResult<Vec<OfflineRecord>>;

    /// Returns the record with the given id, if present.
    async fn get(&self, id: &str) -> OfflineResult<Option<OfflineRecord>>;

    /// Inserts or replaces a record, keyed by its id.
    async fn put(&self, record: OfflineRecord) -> OfflineResult<()>;

    /// Removes the record with the given id. Removing a missing record is
    /// not an error.
    async fn remove(&self, id: &str) -> OfflineResult<()>;
}

/// In-memory store, the default for tests and single-process hosts.
#[derive(Default)]
pub struct MemoryOfflineStore {
    records: RwLock<HashMap<String, OfflineRecord>>,
}

impl MemoryOfflineStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OfflineStore for MemoryOfflineStore {
    async fn list(&self) -> OfflineResult<Vec<OfflineRecord>> {
        Ok(self.records.read().values().cloned().collect())
    }

    async fn get(&self, id: &str) -> OfflineResult<Option<OfflineRecord>> {
        Ok(self.records.read().get(id).cloned())
    }

    async fn put(&self, record: OfflineRecord) -> OfflineResult<()> {
        self.records.write().insert(record.id.clone(), record);
        Ok(())
    }

    async fn remove(&self, id: &str) -> OfflineResult<()> {
        self.records.write().remove(id);
        Ok(())
    }
}

/// Durable store backed by a single JSON document on disk.
///
/// Reads fail open: a missing, unreadable, or unparseable file is treated
/// as an empty store so reconciliation keeps running.
pub struct JsonFileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles against the file.
    io_lock: tokio::sync::Mutex<()>,
}

impl JsonFileStore {
    /// Creates a store over the given file path. The file is created on
    /// first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            io_lock: tokio::sync::Mutex::new(()),
        }
    }

    async fn read_all(&self) -> HashMap<String, OfflineRecord> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(records) => records,
                Err(err) => {
                    warn!(
                        path = %self.path.display(),
                        error = %err,
                        "Offline store unreadable, treating as empty"
                    );
                    HashMap::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => {
                warn!(
                    path = %self.path.display(),
                    error = %err,
                    "Offline store unreadable, treating as empty"
                );
                HashMap::new()
            }
        }
    }

    async fn write_all(&self, records: &HashMap<String, OfflineRecord>) -> OfflineResult<()> {
        let bytes = serde_json::to_vec_pretty(records)?;
        tokio::fs::write(&self.path, bytes)
            .await
            .map_err(|err| OfflineError::Storage(format!("write {}: {err}", self.path.display())))
    }
}

#[async_trait]
impl OfflineStore for JsonFileStore {
    async fn list(&self) -> OfflineResult<Vec<OfflineRecord>> {
        let _guard = self.io_lock.lock().await;
        Ok(self.read_all().await.into_values().collect())
    }

    async fn get(&self, id: &str) -> OfflineResult<Option<OfflineRecord>> {
        let _guard = self.io_lock.lock().await;
        Ok(self.read_all().await.remove(id))
    }

    async fn put(&self, record: OfflineRecord) -> OfflineResult<()> {
        let _guard = self.io_lock.lock().await;
        let mut records = self.read_all().await;
        records.insert(record.id.clone(), record);
        self.write_all(&records).await
    }

    async fn remove(&self, id: &str) -> OfflineResult<()> {
        let _guard = self.io_lock.lock().await;
        let mut records = self.read_all().await;
        records.remove(id);
        self.write_all(&records).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::OfflineStatus;
    use serde_json::json;

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("courier-store-{}.json", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryOfflineStore::new();
        let record = OfflineRecord::new("form-submission", json!({"name": "A"}), 3);
        let id = record.id.clone();

        store.put(record).await.unwrap();
        assert_eq!(store.list().await.unwrap().len(), 1);

        let found = store.get(&id).await.unwrap().unwrap();
        assert_eq!(found.id, id);

        store.remove(&id).await.unwrap();
        assert!(store.get(&id).await.unwrap().is_none());
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_memory_store_put_replaces() {
        let store = MemoryOfflineStore::new();
        let mut record = OfflineRecord::new("form-submission", json!({}), 3);
        let id = record.id.clone();
        store.put(record.clone()).await.unwrap();

        record.attempts = 2;
        record.status = OfflineStatus::InFlight;
        store.put(record).await.unwrap();

        let found = store.get(&id).await.unwrap().unwrap();
        assert_eq!(found.attempts, 2);
        assert_eq!(found.status, OfflineStatus::InFlight);
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_file_store_round_trip() {
        let path = temp_path();
        let store = JsonFileStore::new(&path);
        let record = OfflineRecord::new("form-submission", json!({"name": "A"}), 3);
        let id = record.id.clone();

        store.put(record).await.unwrap();

        // A second store instance over the same path sees the record.
        let reopened = JsonFileStore::new(&path);
        let found = reopened.get(&id).await.unwrap().unwrap();
        assert_eq!(found.id, id);

        reopened.remove(&id).await.unwrap();
        assert!(reopened.list().await.unwrap().is_empty());

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn test_file_store_missing_file_is_empty() {
        let store = JsonFileStore::new(temp_path());
        assert!(store.list().await.unwrap().is_empty());
        assert!(store.get("anything").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_store_corruption_fails_open() {
        let path = temp_path();
        tokio::fs::write(&path, b"{not json at all").await.unwrap();

        let store = JsonFileStore::new(&path);
        assert!(store.list().await.unwrap().is_empty());

        // Writing repairs the file.
        let record = OfflineRecord::new("form-submission", json!({}), 3);
        let id = record.id.clone();
        store.put(record).await.unwrap();
        assert!(store.get(&id).await.unwrap().is_some());

        let _ = tokio::fs::remove_file(&path).await;
    }
}
