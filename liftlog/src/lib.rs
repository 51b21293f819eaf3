//! Liftlog: workout session tracking that never loses a logged set.
//!
//! This crate wires the component crates together:
//!
//! - [`liftlog_store`]: durable records behind a four-call key-value contract
//! - [`liftlog_session`]: the editable set grid and its debounced persistence
//! - [`liftlog_history`]: previous-session lookups, progression and stats
//! - [`liftlog_sync`]: remote history import and template-selection conflicts
//!
//! [`Liftlog::open`] builds everything from a [`LiftlogConfig`];
//! [`logging::init`] installs log output.

mod app;
pub mod config;
mod error;
pub mod logging;

pub use app::Liftlog;
pub use config::{ConfigError, LiftlogConfig};
pub use error::{LiftlogError, LiftlogResult};

pub use liftlog_history as history;
pub use liftlog_session as session;
pub use liftlog_store as store;
pub use liftlog_sync as sync;
pub use liftlog_types as types;
