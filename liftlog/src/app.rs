use crate::config::LiftlogConfig;
use crate::error::LiftlogResult;
use liftlog_history::HistoryAggregator;
use liftlog_session::{SessionEvent, SessionRepository};
use liftlog_store::backup::{self, Backup, RestoreMode};
use liftlog_store::{KvStore, MemoryStore, SqliteStore, WorkoutArchive};
use liftlog_sync::{ImportReport, Importer, Reconciler, RemoteHistory, RetryPolicy};
use liftlog_types::{TemplateCatalog, Workout};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, RwLock, RwLockReadGuard};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// A running Liftlog core: one store, the session repository over it, the
/// history index and the reconciler.
///
/// Completed workouts and completed sets flow from the session repository
/// into the history index through the session event channel.
pub struct Liftlog {
    store: Arc<dyn KvStore>,
    catalog: TemplateCatalog,
    retry: RetryPolicy,
    sessions: SessionRepository,
    reconciler: Reconciler,
    history: Arc<RwLock<HistoryAggregator>>,
    forwarder: JoinHandle<()>,
}

impl Liftlog {
    /// Opens the store named by the config (in memory if none) and wires
    /// the components over it.
    pub async fn open(config: &LiftlogConfig) -> LiftlogResult<Self> {
        let store: Arc<dyn KvStore> = match &config.store.path {
            Some(path) => {
                let path = path.clone();
                Arc::new(tokio::task::spawn_blocking(move || SqliteStore::open(path)).await??)
            }
            None => {
                debug!("No store path configured, keeping records in memory");
                Arc::new(MemoryStore::new())
            }
        };
        Self::with_store(store, config).await
    }

    /// Wires the components over an existing store.
    pub async fn with_store(store: Arc<dyn KvStore>, config: &LiftlogConfig) -> LiftlogResult<Self> {
        let catalog = config.catalog();
        let sessions = SessionRepository::new(store.clone(), catalog.clone(), config.session_config());

        let archive = WorkoutArchive::new(store.clone());
        let aggregator = tokio::task::spawn_blocking(move || HistoryAggregator::load(&archive)).await??;
        info!("Indexed {} completed workouts", aggregator.len());
        let history = Arc::new(RwLock::new(aggregator));

        let forwarder = tokio::spawn(forward_events(sessions.subscribe(), history.clone()));

        Ok(Self {
            store,
            catalog,
            retry: config.retry_policy(),
            reconciler: Reconciler::new(sessions.clone()),
            sessions,
            history,
            forwarder,
        })
    }

    pub fn sessions(&self) -> &SessionRepository {
        &self.sessions
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    pub fn catalog(&self) -> &TemplateCatalog {
        &self.catalog
    }

    /// Read access to the history index.
    pub async fn history(&self) -> RwLockReadGuard<'_, HistoryAggregator> {
        self.history.read().await
    }

    /// Completes the open session and indexes the workout before
    /// returning, so history queries see it immediately.
    pub async fn complete(&self) -> LiftlogResult<Workout> {
        let workout = self.sessions.complete().await?;
        self.history.write().await.index(workout.clone());
        Ok(workout)
    }

    /// An importer for `remote` over this store. Its merges wait for any
    /// session transition in progress, completions included.
    pub fn importer(&self, remote: Arc<dyn RemoteHistory>) -> Importer {
        Importer::new(
            remote,
            WorkoutArchive::new(self.store.clone()),
            self.catalog.clone(),
            self.retry.clone(),
        )
        .with_lock(self.sessions.transition_lock())
    }

    /// Imports remote history and indexes what was written.
    pub async fn import(&self, remote: Arc<dyn RemoteHistory>) -> LiftlogResult<ImportReport> {
        let report = self.importer(remote).import().await?;
        let mut history = self.history.write().await;
        for workout in &report.imported {
            history.index(workout.clone());
        }
        Ok(report)
    }

    /// Snapshot of every session and workout record.
    pub async fn export_backup(&self) -> LiftlogResult<Backup> {
        let store = self.store.clone();
        Ok(tokio::task::spawn_blocking(move || backup::export(store.as_ref())).await??)
    }

    /// Restores a backup and rebuilds the history index from the store.
    pub async fn restore_backup(&self, backup: Backup, mode: RestoreMode) -> LiftlogResult<usize> {
        let store = self.store.clone();
        let (written, aggregator) = tokio::task::spawn_blocking(move || {
            let written = backup::restore(store.as_ref(), &backup, mode)?;
            let aggregator = HistoryAggregator::load(&WorkoutArchive::new(store))?;
            Ok::<_, liftlog_store::StorageError>((written, aggregator))
        })
        .await??;

        *self.history.write().await = aggregator;
        info!("Restored {} records ({:?})", written, mode);
        Ok(written)
    }

    /// Flushes and closes the open session.
    pub async fn shutdown(self) -> LiftlogResult<()> {
        self.sessions.close().await?;
        self.forwarder.abort();
        Ok(())
    }
}

async fn forward_events(
    mut events: broadcast::Receiver<SessionEvent>,
    history: Arc<RwLock<HistoryAggregator>>,
) {
    loop {
        match events.recv().await {
            Ok(SessionEvent::Completed(workout)) => history.write().await.index(workout),
            Ok(SessionEvent::SetCompleted(event)) => history.write().await.observe(&event),
            Ok(_) => {}
            Err(RecvError::Lagged(missed)) => {
                warn!("History missed {} session events", missed);
            }
            Err(RecvError::Closed) => break,
        }
    }
}
