//! Core type definitions for Liftlog.
//!
//! This crate defines the data model shared by every other crate:
//! - Session and Workout identifiers (UUID v7 generation tokens)
//! - Save timestamps with a monotonic tie-breaker
//! - Calendar dates, template keys and the template catalog
//! - Sets, exercise logs, in-progress Sessions and completed Workouts
//!
//! Nothing here performs I/O. Persistence lives in `liftlog-store`, the
//! session lifecycle in `liftlog-session`.

mod date;
mod event;
mod ids;
pub mod legacy;
mod session;
mod set;
mod template;
mod timestamp;
mod workout;

pub use date::WorkoutDate;
pub use event::SetCompleted;
pub use ids::{SessionId, WorkoutId};
pub use session::{Session, SessionKey};
pub use set::{ExerciseLog, Set, SetField};
pub use template::{Template, TemplateCatalog, TemplateKey};
pub use timestamp::Timestamp;
pub use workout::{Workout, WorkoutSource};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("invalid set field: {0}")]
    InvalidField(String),

    #[error("invalid record: {0}")]
    InvalidRecord(String),
}
