//! The remote historical store boundary.
//!
//! The remote is an append-only log of set rows (one row per set). The
//! core only reads it, except for an explicit export of a completed
//! workout.

use crate::error::{SyncError, SyncResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One row of the remote log, as the remote stores it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRow {
    #[serde(default)]
    pub date: String,
    #[serde(default, alias = "template")]
    pub template_label: String,
    #[serde(default)]
    pub exercise: String,
    #[serde(default, alias = "set")]
    pub set_number: String,
    #[serde(default, alias = "weightLbs")]
    pub weight: String,
    #[serde(default)]
    pub reps: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Session status column; rows of a session still in progress
    /// remotely are marked `active`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// A remote store of completed workouts.
#[async_trait]
pub trait RemoteHistory: Send + Sync {
    /// Name recorded as the origin of imported workouts.
    fn provider_name(&self) -> &str;

    /// Fetches every row of the remote log.
    async fn fetch_all(&self) -> SyncResult<Vec<RawRow>>;

    /// Appends rows to the remote log. Read-only providers reject.
    async fn append_rows(&self, rows: Vec<RawRow>) -> SyncResult<usize> {
        let _ = rows;
        Err(SyncError::RemoteRejected(format!(
            "{} is read-only",
            self.provider_name()
        )))
    }
}

/// An in-memory remote for testing.
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Mutex, MutexGuard, PoisonError};

    /// A remote holding rows in memory, with injectable failures.
    #[derive(Debug)]
    pub struct MockRemote {
        name: String,
        rows: Mutex<Vec<RawRow>>,
        failures_remaining: AtomicU32,
        reject: bool,
        calls: AtomicU32,
    }

    impl MockRemote {
        /// Creates a remote serving `rows`.
        pub fn new(rows: Vec<RawRow>) -> Self {
            Self {
                name: "mock-sheet".to_string(),
                rows: Mutex::new(rows),
                failures_remaining: AtomicU32::new(0),
                reject: false,
                calls: AtomicU32::new(0),
            }
        }

        /// Fails the next `n` calls with a transient error.
        pub fn failing(self, n: u32) -> Self {
            self.failures_remaining.store(n, Ordering::SeqCst);
            self
        }

        /// Rejects every call with a permanent error.
        pub fn rejecting(mut self) -> Self {
            self.reject = true;
            self
        }

        pub fn with_name(mut self, name: impl Into<String>) -> Self {
            self.name = name.into();
            self
        }

        /// Number of calls made, including failed ones.
        pub fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }

        /// Current rows, including appended ones.
        pub fn rows(&self) -> Vec<RawRow> {
            self.lock().clone()
        }

        fn lock(&self) -> MutexGuard<'_, Vec<RawRow>> {
            self.rows.lock().unwrap_or_else(PoisonError::into_inner)
        }

        fn check(&self) -> SyncResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.reject {
                return Err(SyncError::RemoteRejected("access denied".into()));
            }
            let failing = self
                .failures_remaining
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if failing {
                return Err(SyncError::Remote("connection reset".into()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl RemoteHistory for MockRemote {
        fn provider_name(&self) -> &str {
            &self.name
        }

        async fn fetch_all(&self) -> SyncResult<Vec<RawRow>> {
            self.check()?;
            Ok(self.rows())
        }

        async fn append_rows(&self, rows: Vec<RawRow>) -> SyncResult<usize> {
            self.check()?;
            let count = rows.len();
            self.lock().extend(rows);
            Ok(count)
        }
    }
}
