//! Remote history and reconciliation for Liftlog.
//!
//! # Components
//!
//! - **Remote**: [`RemoteHistory`], the narrow contract to the remote
//!   historical store, plus [`remote::mock`] for tests
//! - **Normalize**: sparse remote rows ↔ dense [`Workout`] grids
//! - **Retry**: capped exponential backoff for every remote call
//! - **Importer**: explicit import honouring manual-workout precedence
//! - **Reconcile**: resume / discard / cancel decisions on template
//!   selection
//!
//! Remote failures never touch local session state; they surface as
//! [`SyncError::RemoteUnavailable`] once retries are spent.
//!
//! [`Workout`]: liftlog_types::Workout

mod error;
pub mod importer;
pub mod normalize;
pub mod reconcile;
pub mod remote;
pub mod retry;

pub use error::{SyncError, SyncResult};
pub use importer::{ImportReport, Importer};
pub use normalize::{normalize_rows, rows_for_workout, DropReason, DroppedRow, NormalizedBatch};
pub use reconcile::{Reconciler, Resolution, Resolved, SelectOutcome, SessionConflict};
pub use remote::{RawRow, RemoteHistory};
pub use retry::{retry_with_backoff, RetryPolicy};
