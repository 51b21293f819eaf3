//! The key-value contract every backend implements.

use crate::error::StorageResult;

/// Durable string-keyed storage.
pub trait KvStore: Send + Sync {
    /// Returns the value stored under `key`.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Removes `key`. Returns true if a value was removed.
    fn delete(&self, key: &str) -> StorageResult<bool>;

    /// Returns every key starting with `prefix`, sorted.
    fn list_keys_with_prefix(&self, prefix: &str) -> StorageResult<Vec<String>>;

    /// Returns true if a value is stored under `key`.
    fn contains(&self, key: &str) -> StorageResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}
