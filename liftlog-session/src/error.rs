//! Error types for the session layer.

use liftlog_store::StorageError;
use liftlog_types::{SessionId, SessionKey, TemplateKey};
use thiserror::Error;

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors that can occur in session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The template key has no definition in the catalog.
    #[error("unknown template: {0}")]
    InvalidTemplate(TemplateKey),

    /// Completion attempted with no set holding both weight and reps.
    #[error("session {0} has no set with both weight and reps")]
    NoValidSets(SessionKey),

    /// The stored record for the open session was written by another
    /// session generation. Resolve with `keep_local` or `reload`.
    #[error("session {key} was replaced by another writer (open {local}, stored {stored})")]
    SessionConflict {
        key: SessionKey,
        local: SessionId,
        stored: SessionId,
    },

    /// The stored record of the open session was deleted by another
    /// writer (completed or discarded elsewhere). Resolve with
    /// `keep_local` or `reload`.
    #[error("session {key} was removed by another writer (open {local})")]
    SessionRemoved { key: SessionKey, local: SessionId },

    /// A durable read or write failed. The in-memory session is intact.
    #[error("{operation} failed for {key}: {source}")]
    Persistence {
        operation: &'static str,
        key: String,
        #[source]
        source: StorageError,
    },

    /// The operation needs an open session.
    #[error("no session is open")]
    NoOpenSession,

    /// The exercise or set index does not exist in the open session.
    #[error("no set {index} for exercise {exercise:?}")]
    SetNotFound { exercise: String, index: usize },
}

impl SessionError {
    /// True when the session state survives the error and the caller can
    /// act (add data, retry, pick a side) without losing anything.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SessionError::NoValidSets(_)
                | SessionError::SessionConflict { .. }
                | SessionError::SessionRemoved { .. }
                | SessionError::Persistence { .. }
        )
    }
}
