//! Durable local storage for Liftlog.
//!
//! The core needs exactly four operations from the device's storage:
//! `get`, `set`, `delete` and `list_keys_with_prefix`. [`KvStore`] captures
//! that contract; [`MemoryStore`] and [`SqliteStore`] implement it.
//!
//! # Architecture
//!
//! - Records are JSON strings keyed by [`RecordKey`]:
//!   `session-{date}-{templateKey}` for in-progress sessions and
//!   `workout-complete-{date}-{templateKey}` for completed workouts
//! - [`SessionRecords`] and [`WorkoutArchive`] are typed views over a store
//! - [`backup`] exports and restores every record as one JSON document
//!
//! All calls are blocking. Async callers run them through
//! `tokio::task::spawn_blocking`.

pub mod backup;
mod error;
mod keys;
mod kv;
mod memory;
mod records;
mod sqlite;

pub use error::{StorageError, StorageResult};
pub use keys::{RecordKey, SESSION_PREFIX, WORKOUT_PREFIX};
pub use kv::KvStore;
pub use memory::MemoryStore;
pub use records::{SessionRecords, WorkoutArchive};
pub use sqlite::SqliteStore;
