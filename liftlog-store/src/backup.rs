//! Whole-store export and restore.
//!
//! A [`Backup`] holds every session and workout record as its raw JSON
//! value, so a restore reproduces the records exactly.

use crate::error::StorageResult;
use crate::keys::{RecordKey, SESSION_PREFIX, WORKOUT_PREFIX};
use crate::kv::KvStore;
use liftlog_types::Timestamp;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Snapshot of every record in a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    pub exported_at: Timestamp,
    pub records: Vec<BackupRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupRecord {
    pub key: String,
    pub value: String,
}

impl Backup {
    pub fn to_json(&self) -> StorageResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> StorageResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// How [`restore`] treats records already in the target store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreMode {
    /// Existing keys are kept; only missing records are written.
    Merge,
    /// Every session and workout record is removed before writing.
    Replace,
}

/// Exports every session and workout record.
pub fn export(store: &dyn KvStore) -> StorageResult<Backup> {
    let mut records = Vec::new();
    for prefix in [SESSION_PREFIX, WORKOUT_PREFIX] {
        for key in store.list_keys_with_prefix(prefix)? {
            if let Some(value) = store.get(&key)? {
                records.push(BackupRecord { key, value });
            }
        }
    }
    info!("Exported {} records", records.len());
    Ok(Backup {
        exported_at: Timestamp::now(),
        records,
    })
}

/// Writes the backup's records into `store`. Records whose key does not
/// follow the naming scheme are skipped. Returns the number written.
pub fn restore(store: &dyn KvStore, backup: &Backup, mode: RestoreMode) -> StorageResult<usize> {
    if mode == RestoreMode::Replace {
        for prefix in [SESSION_PREFIX, WORKOUT_PREFIX] {
            for key in store.list_keys_with_prefix(prefix)? {
                store.delete(&key)?;
            }
        }
    }

    let mut written = 0;
    for record in &backup.records {
        if let Err(e) = RecordKey::parse(&record.key) {
            warn!("Skipping backup record: {}", e);
            continue;
        }
        if mode == RestoreMode::Merge && store.contains(&record.key)? {
            continue;
        }
        store.set(&record.key, &record.value)?;
        written += 1;
    }
    info!("Restored {} of {} records ({:?})", written, backup.records.len(), mode);
    Ok(written)
}
