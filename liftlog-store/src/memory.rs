//! In-memory backend, used for tests and when no store path is configured.

use crate::error::{StorageError, StorageResult};
use crate::kv::KvStore;
use std::collections::BTreeMap;
use std::sync::RwLock;

/// A [`KvStore`] held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let records = self.records.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(records.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut records = self.records.write().map_err(|_| StorageError::LockPoisoned)?;
        records.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> StorageResult<bool> {
        let mut records = self.records.write().map_err(|_| StorageError::LockPoisoned)?;
        Ok(records.remove(key).is_some())
    }

    fn list_keys_with_prefix(&self, prefix: &str) -> StorageResult<Vec<String>> {
        let records = self.records.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(records
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, _)| k.clone())
            .collect())
    }
}
