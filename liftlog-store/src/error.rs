//! Error types for the storage layer.

use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored record could not be decoded into its type.
    #[error("invalid record {key}: {reason}")]
    InvalidRecord { key: String, reason: String },

    /// A key does not follow the record naming scheme.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// The backend refused or failed a write.
    #[error("write failed: {0}")]
    WriteFailed(String),

    /// A lock guarding the backend was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    LockPoisoned,
}
