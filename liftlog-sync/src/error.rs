//! Error types for the sync layer.

use liftlog_session::SessionError;
use liftlog_store::StorageError;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur in sync operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The remote store kept failing until the retry budget ran out.
    /// Local state is untouched.
    #[error("remote {operation} unavailable after {attempts} attempts: {message}")]
    RemoteUnavailable {
        operation: &'static str,
        attempts: u32,
        message: String,
    },

    /// A single remote call failed (network, timeout, server error).
    #[error("remote error: {0}")]
    Remote(String),

    /// The remote refused the request. Retrying will not help.
    #[error("remote rejected request: {0}")]
    RemoteRejected(String),

    /// Storage error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Session lifecycle error.
    #[error("session error: {0}")]
    Session(#[from] SessionError),
}

impl SyncError {
    /// True for transient remote failures worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SyncError::Remote(_))
    }
}
