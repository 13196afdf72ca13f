//! Durable string storage contract
//!
//! Preferences are written through a narrow string key-value boundary so the
//! same gateway works over the sled-backed [`KvStore`](crate::kv::KvStore),
//! the process-local [`MemoryStorage`], or a host-provided backend.

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::kv::KvError;

/// Durable storage error types
#[derive(Debug, Error)]
pub enum StorageError {
    /// Key-value backend error
    #[error("Key-value error: {0}")]
    Kv(#[from] KvError),

    /// Backend could not service the request
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Result type for durable storage operations
pub type Result<T> = std::result::Result<T, StorageError>;

/// Asynchronous string key-value storage
///
/// Both reads and writes may fail; callers decide how to degrade.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DurableStorage: Send + Sync {
    /// Read the value stored under `key`, `None` if absent
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the value stored under `key`, if any
    async fn remove(&self, key: &str) -> Result<()>;
}

/// In-memory storage backend
///
/// Values live for the lifetime of the instance. Useful for hosts without a
/// writable disk and for sharing one "installation" between store instances.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty memory storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Check if nothing is stored
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl DurableStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_storage_set_and_get() {
        let storage = MemoryStorage::new();
        assert!(storage.is_empty().await);

        storage.set("mode", "dark").await.unwrap();
        assert_eq!(storage.get("mode").await.unwrap(), Some("dark".to_string()));
        assert_eq!(storage.len().await, 1);
    }

    #[tokio::test]
    async fn test_memory_storage_overwrite_and_remove() {
        let storage = MemoryStorage::new();

        storage.set("mode", "dark").await.unwrap();
        storage.set("mode", "light").await.unwrap();
        assert_eq!(storage.get("mode").await.unwrap(), Some("light".to_string()));

        storage.remove("mode").await.unwrap();
        assert_eq!(storage.get("mode").await.unwrap(), None);

        // Removing an absent key is not an error
        storage.remove("mode").await.unwrap();
    }

    #[tokio::test]
    async fn test_mock_storage_reports_failure() {
        let mut storage = MockDurableStorage::new();
        storage
            .expect_get()
            .returning(|_| Err(StorageError::Unavailable("locked".to_string())));

        let result = storage.get("mode").await;
        assert!(matches!(result, Err(StorageError::Unavailable(_))));
    }
}
