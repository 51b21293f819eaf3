//! Top-level error type.

use crate::config::ConfigError;
use liftlog_session::SessionError;
use liftlog_store::StorageError;
use liftlog_sync::SyncError;
use thiserror::Error;

/// Result type for facade operations.
pub type LiftlogResult<T> = Result<T, LiftlogError>;

#[derive(Debug, Error)]
pub enum LiftlogError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("session error: {0}")]
    Session(#[from] SessionError),

    #[error("sync error: {0}")]
    Sync(#[from] SyncError),

    /// A blocking task panicked or was cancelled.
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
