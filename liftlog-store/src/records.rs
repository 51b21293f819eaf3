//! Typed views over a [`KvStore`] for sessions and workouts.

use crate::error::{StorageError, StorageResult};
use crate::keys::{RecordKey, SESSION_PREFIX, WORKOUT_PREFIX};
use crate::kv::KvStore;
use liftlog_types::legacy::decode_session;
use liftlog_types::{Session, SessionKey, Workout};
use std::sync::Arc;
use tracing::warn;

/// In-progress session records, one per (date, template).
#[derive(Clone)]
pub struct SessionRecords {
    store: Arc<dyn KvStore>,
}

impl SessionRecords {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Loads the session stored for `key`. Older record shapes are
    /// normalised on read.
    pub fn get(&self, key: &SessionKey) -> StorageResult<Option<Session>> {
        let raw_key = RecordKey::session(key);
        match self.store.get(&raw_key)? {
            Some(json) => decode_session(&json)
                .map(Some)
                .map_err(|e| StorageError::InvalidRecord {
                    key: raw_key,
                    reason: e.to_string(),
                }),
            None => Ok(None),
        }
    }

    pub fn put(&self, session: &Session) -> StorageResult<()> {
        let json = serde_json::to_string(session)?;
        self.store.set(&RecordKey::session(&session.key()), &json)
    }

    /// Removes the record. Returns true if one existed.
    pub fn delete(&self, key: &SessionKey) -> StorageResult<bool> {
        self.store.delete(&RecordKey::session(key))
    }

    /// Every readable session record. Unreadable records are skipped with
    /// a warning rather than failing the whole listing.
    pub fn list(&self) -> StorageResult<Vec<Session>> {
        let mut sessions = Vec::new();
        for raw_key in self.store.list_keys_with_prefix(SESSION_PREFIX)? {
            let Ok(RecordKey::Session(key)) = RecordKey::parse(&raw_key) else {
                warn!("Skipping session record with malformed key {}", raw_key);
                continue;
            };
            match self.get(&key) {
                Ok(Some(session)) => sessions.push(session),
                Ok(None) => {}
                Err(e) => warn!("Skipping unreadable session record {}: {}", raw_key, e),
            }
        }
        Ok(sessions)
    }
}

/// Completed workout records, unique per (date, template).
#[derive(Clone)]
pub struct WorkoutArchive {
    store: Arc<dyn KvStore>,
}

impl WorkoutArchive {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    pub fn get(&self, key: &SessionKey) -> StorageResult<Option<Workout>> {
        let raw_key = RecordKey::workout(key);
        match self.store.get(&raw_key)? {
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|e| StorageError::InvalidRecord {
                    key: raw_key,
                    reason: e.to_string(),
                }),
            None => Ok(None),
        }
    }

    /// Stores the workout, replacing any record with the same key.
    pub fn put(&self, workout: &Workout) -> StorageResult<()> {
        let json = serde_json::to_string(workout)?;
        self.store.set(&RecordKey::workout(&workout.key()), &json)
    }

    pub fn delete(&self, key: &SessionKey) -> StorageResult<bool> {
        self.store.delete(&RecordKey::workout(key))
    }

    pub fn contains(&self, key: &SessionKey) -> StorageResult<bool> {
        self.store.contains(&RecordKey::workout(key))
    }

    /// Every readable workout, ordered by date then completion time.
    pub fn list(&self) -> StorageResult<Vec<Workout>> {
        let mut workouts = Vec::new();
        for raw_key in self.store.list_keys_with_prefix(WORKOUT_PREFIX)? {
            let Ok(RecordKey::Workout(key)) = RecordKey::parse(&raw_key) else {
                warn!("Skipping workout record with malformed key {}", raw_key);
                continue;
            };
            match self.get(&key) {
                Ok(Some(workout)) => workouts.push(workout),
                Ok(None) => {}
                Err(e) => warn!("Skipping unreadable workout record {}: {}", raw_key, e),
            }
        }
        workouts.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.completed_at.cmp(&b.completed_at))
        });
        Ok(workouts)
    }
}
