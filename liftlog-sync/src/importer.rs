//! Explicit import of remote history into the local workout archive.
//!
//! Manual workouts are authoritative: an imported workout for a key that
//! already holds a manual one is skipped and the manual record is left
//! untouched. A previous import for the same key is replaced.
//!
//! An importer built [`with_lock`](Importer::with_lock) holds that lock
//! while it writes, so a merge never interleaves with a session being
//! completed into the same archive.

use crate::error::{SyncError, SyncResult};
use crate::normalize::{normalize_rows, rows_for_workout, DroppedRow, NormalizedBatch};
use crate::remote::RemoteHistory;
use crate::retry::{retry_with_backoff, RetryPolicy};
use liftlog_store::{StorageError, StorageResult, WorkoutArchive};
use liftlog_types::{TemplateCatalog, Workout};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Outcome of an import.
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    /// Workouts written for keys that had none.
    pub inserted: usize,
    /// Earlier imports overwritten with newer remote data.
    pub replaced: usize,
    /// Earlier imports identical to the remote data.
    pub unchanged: usize,
    /// Keys held by a manual workout, left as they were.
    pub skipped_manual: usize,
    /// Keys whose stored record could not be read, left as they were.
    pub skipped_unreadable: usize,
    /// Rows that failed validation.
    pub dropped: Vec<DroppedRow>,
    /// The workouts written (inserted or replaced).
    pub imported: Vec<Workout>,
}

/// Pulls remote history into the archive.
pub struct Importer {
    remote: Arc<dyn RemoteHistory>,
    archive: WorkoutArchive,
    catalog: TemplateCatalog,
    policy: RetryPolicy,
    write_lock: Option<Arc<Mutex<()>>>,
}

impl Importer {
    pub fn new(
        remote: Arc<dyn RemoteHistory>,
        archive: WorkoutArchive,
        catalog: TemplateCatalog,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            remote,
            archive,
            catalog,
            policy,
            write_lock: None,
        }
    }

    /// Serialises merges with other holders of `lock`.
    pub fn with_lock(mut self, lock: Arc<Mutex<()>>) -> Self {
        self.write_lock = Some(lock);
        self
    }

    /// Fetches and normalises the remote log without touching local state.
    pub async fn fetch(&self) -> SyncResult<NormalizedBatch> {
        let rows = retry_with_backoff(&self.policy, "fetch_all", || self.remote.fetch_all()).await?;
        let batch = normalize_rows(&rows, &self.catalog, self.remote.provider_name());
        info!(
            "Fetched {} rows from {}: {} workouts, {} dropped",
            rows.len(),
            self.remote.provider_name(),
            batch.workouts.len(),
            batch.dropped.len()
        );
        Ok(batch)
    }

    /// Fetches the remote log and merges it into the archive.
    pub async fn import(&self) -> SyncResult<ImportReport> {
        let batch = self.fetch().await?;
        self.apply(batch).await
    }

    /// Merges an already-normalised batch into the archive.
    pub async fn apply(&self, batch: NormalizedBatch) -> SyncResult<ImportReport> {
        let archive = self.archive.clone();
        let NormalizedBatch { workouts, dropped } = batch;

        let _guard = match &self.write_lock {
            Some(lock) => Some(lock.lock().await),
            None => None,
        };
        let mut report = tokio::task::spawn_blocking(move || merge(&archive, workouts))
            .await
            .map_err(|e| SyncError::Storage(StorageError::WriteFailed(format!("import task failed: {e}"))))??;
        report.dropped = dropped;

        info!(
            "Import: {} inserted, {} replaced, {} unchanged, {} kept manual, {} rows dropped",
            report.inserted,
            report.replaced,
            report.unchanged,
            report.skipped_manual,
            report.dropped.len()
        );
        Ok(report)
    }

    /// Appends a completed workout's sets to the remote log. Only called
    /// on an explicit user export.
    pub async fn push_workout(&self, workout: &Workout) -> SyncResult<usize> {
        let rows = rows_for_workout(workout);
        if rows.is_empty() {
            return Ok(0);
        }
        let written = retry_with_backoff(&self.policy, "append_rows", || {
            self.remote.append_rows(rows.clone())
        })
        .await?;
        info!("Exported workout {} ({} rows)", workout.key(), written);
        Ok(written)
    }
}

/// Applies the manual-precedence merge rule. Blocking.
pub fn merge(archive: &WorkoutArchive, workouts: Vec<Workout>) -> StorageResult<ImportReport> {
    let mut report = ImportReport::default();

    for mut incoming in workouts {
        let key = incoming.key();
        let existing = match archive.get(&key) {
            Ok(existing) => existing,
            Err(StorageError::InvalidRecord { key: raw, reason }) => {
                warn!("Keeping unreadable workout record {} over import: {}", raw, reason);
                report.skipped_unreadable += 1;
                continue;
            }
            Err(e) => return Err(e),
        };

        match existing {
            Some(existing) if existing.source.is_manual() => {
                report.skipped_manual += 1;
            }
            Some(existing) => {
                if existing.exercises == incoming.exercises && existing.source == incoming.source {
                    report.unchanged += 1;
                    continue;
                }
                incoming.id = existing.id;
                archive.put(&incoming)?;
                report.replaced += 1;
                report.imported.push(incoming);
            }
            None => {
                archive.put(&incoming)?;
                report.inserted += 1;
                report.imported.push(incoming);
            }
        }
    }

    Ok(report)
}
