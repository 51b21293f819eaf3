//! Session lifecycle for Liftlog.
//!
//! A session is the mutable, in-progress form of a workout for one
//! (date, template) pair. This crate owns it from selection to completion.
//!
//! # Components
//!
//! - **[`SetStore`]**: the exercise → sets grid of the open session. Pure
//!   data edits, no I/O.
//! - **[`SessionRepository`]**: the lifecycle state machine
//!   (`Absent → Active → Completed | Absent`). Edits are persisted after a
//!   short debounce window; completion writes the [`Workout`] before
//!   removing the session record.
//! - **[`SessionEvent`]**: broadcast notifications for set completion,
//!   persistence results and lifecycle transitions.
//!
//! [`Workout`]: liftlog_types::Workout

mod config;
mod debounce;
mod error;
mod events;
mod repository;
mod set_store;

pub use config::SessionConfig;
pub use error::{SessionError, SessionResult};
pub use events::SessionEvent;
pub use repository::{SessionRepository, Started};
pub use set_store::{SetStore, SetUpdate};
