//! Session lifecycle and durable persistence.
//!
//! The repository holds at most one open session in memory. Edits go
//! through the [`SetStore`] synchronously and are written to the store
//! once the debounce window has been quiet. Durable work (persist,
//! completion, discard) is serialised by a single async lock so a late
//! debounced write can never resurrect a completed or discarded session.

use crate::config::SessionConfig;
use crate::debounce::Debouncer;
use crate::error::{SessionError, SessionResult};
use crate::events::SessionEvent;
use crate::set_store::{SetStore, SetUpdate};
use liftlog_store::{
    KvStore, RecordKey, SessionRecords, StorageError, StorageResult, WorkoutArchive,
    SESSION_PREFIX,
};
use liftlog_types::{
    Session, SessionKey, SetCompleted, SetField, TemplateCatalog, TemplateKey, Timestamp,
    Workout, WorkoutDate,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Outcome of [`SessionRepository::start_or_resume`].
#[derive(Debug, Clone)]
pub struct Started {
    pub session: Session,
    /// True when a stored record for the key was loaded.
    pub resumed: bool,
    /// Template exercises missing from the resumed record, added as empty rows.
    pub added_exercises: Vec<String>,
}

struct OpenSession {
    grid: SetStore,
    revision: u64,
    persisted_revision: u64,
    /// A durable record of this generation exists (loaded or written).
    /// Its later disappearance means another writer removed it.
    stored: bool,
}

impl OpenSession {
    fn new(session: Session, dirty: bool, stored: bool) -> Self {
        Self {
            grid: SetStore::new(session),
            revision: u64::from(dirty),
            persisted_revision: 0,
            stored,
        }
    }

    fn is_dirty(&self) -> bool {
        self.revision > self.persisted_revision
    }

    fn key(&self) -> SessionKey {
        self.grid.session().key()
    }
}

struct Inner {
    catalog: TemplateCatalog,
    sessions: SessionRecords,
    workouts: WorkoutArchive,
    config: SessionConfig,
    open: Mutex<Option<OpenSession>>,
    /// Serialises every durable transition.
    persist_lock: Arc<tokio::sync::Mutex<()>>,
    events: broadcast::Sender<SessionEvent>,
    debouncer: Debouncer,
}

/// Owns the active session and its durable record.
///
/// Cheap to clone; clones share the same open session.
#[derive(Clone)]
pub struct SessionRepository {
    inner: Arc<Inner>,
}

impl SessionRepository {
    /// Creates a repository over `store`. Must be called inside a tokio
    /// runtime, which hosts the debounce task.
    pub fn new(store: Arc<dyn KvStore>, catalog: TemplateCatalog, config: SessionConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        let window = config.effective_debounce();

        let inner = Arc::new_cyclic(|weak: &Weak<Inner>| {
            let weak = weak.clone();
            let debouncer = Debouncer::spawn(window, move || {
                let weak = weak.clone();
                async move {
                    if let Some(inner) = weak.upgrade() {
                        // Failures are logged and broadcast by persist.
                        let _ = inner.persist(false).await;
                    }
                }
            });
            Inner {
                catalog,
                sessions: SessionRecords::new(store.clone()),
                workouts: WorkoutArchive::new(store),
                config,
                open: Mutex::new(None),
                persist_lock: Arc::new(tokio::sync::Mutex::new(())),
                events,
                debouncer,
            }
        });

        Self { inner }
    }

    pub fn catalog(&self) -> &TemplateCatalog {
        &self.inner.catalog
    }

    /// The lock held across every durable session transition. Writers of
    /// workout records outside the repository take it so their writes do
    /// not interleave with a completion.
    pub fn transition_lock(&self) -> Arc<tokio::sync::Mutex<()>> {
        self.inner.persist_lock.clone()
    }

    /// Subscribes to session events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    // ── In-memory reads ──────────────────────────────────────────

    pub fn current_key(&self) -> Option<SessionKey> {
        self.inner.lock_open().as_ref().map(OpenSession::key)
    }

    /// Copy of the open session including edits not yet persisted.
    pub fn snapshot(&self) -> Option<Session> {
        self.inner
            .lock_open()
            .as_ref()
            .map(|open| open.grid.session().clone())
    }

    pub fn has_valid_sets(&self) -> bool {
        self.inner
            .lock_open()
            .as_ref()
            .is_some_and(|open| open.grid.has_valid_sets())
    }

    /// True when the open session has edits not yet in durable storage.
    pub fn is_dirty(&self) -> bool {
        self.inner
            .lock_open()
            .as_ref()
            .is_some_and(OpenSession::is_dirty)
    }

    // ── Set edits ────────────────────────────────────────────────

    /// Appends an empty set row and returns its index.
    pub fn add_set(&self, exercise: &str) -> SessionResult<usize> {
        let mut guard = self.inner.lock_open();
        let open = guard.as_mut().ok_or(SessionError::NoOpenSession)?;
        let index = open.grid.add_set(exercise);
        open.revision += 1;
        self.inner.debouncer.touch();
        Ok(index)
    }

    /// Removes a set row. Returns false when the row is the exercise's
    /// last one or does not exist.
    pub fn remove_set(&self, exercise: &str, index: usize) -> SessionResult<bool> {
        let mut guard = self.inner.lock_open();
        let open = guard.as_mut().ok_or(SessionError::NoOpenSession)?;
        let removed = open.grid.remove_set(exercise, index);
        if removed {
            open.revision += 1;
            self.inner.debouncer.touch();
        }
        Ok(removed)
    }

    /// Writes one field of a set and schedules a persist.
    pub fn update_set(
        &self,
        exercise: &str,
        index: usize,
        field: SetField,
        value: impl Into<String>,
    ) -> SessionResult<SetUpdate> {
        let at = Timestamp::now();
        let (key, update) = {
            let mut guard = self.inner.lock_open();
            let open = guard.as_mut().ok_or(SessionError::NoOpenSession)?;
            let update = open
                .grid
                .update_set(exercise, index, field, value, at)
                .ok_or_else(|| SessionError::SetNotFound {
                    exercise: exercise.to_string(),
                    index,
                })?;
            open.revision += 1;
            (open.key(), update)
        };
        self.inner.debouncer.touch();

        if update.completed {
            self.inner.emit(SessionEvent::SetCompleted(SetCompleted {
                key,
                exercise: update.exercise.clone(),
                set_number: update.set_number,
                set: update.set.clone(),
                at,
            }));
        }
        Ok(update)
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Opens the session for `(date, template_key)`.
    ///
    /// A stored record is resumed and aligned with the current template
    /// definition. A record left behind by a completion that wrote its
    /// workout but crashed before deleting the session is removed, and a
    /// fresh session starts. Any other open session is flushed and closed
    /// first.
    pub async fn start_or_resume(
        &self,
        template_key: &TemplateKey,
        date: WorkoutDate,
    ) -> SessionResult<Started> {
        let inner = &self.inner;
        let template = inner
            .catalog
            .get(template_key)
            .cloned()
            .ok_or_else(|| SessionError::InvalidTemplate(template_key.clone()))?;
        let key = SessionKey::new(date, template.key.clone());

        if let Some(session) = self.snapshot().filter(|s| s.key() == key) {
            return Ok(Started {
                session,
                resumed: true,
                added_exercises: Vec::new(),
            });
        }
        self.close().await?;

        let _guard = inner.persist_lock.lock().await;
        let (session, resumed, added_exercises) = match inner.load_for_start(&key).await {
            Some(mut stored) => {
                let added = stored.align_with(&template);
                if !added.is_empty() {
                    info!("Template {} gained {:?} since session {} was saved", template.key, added, key);
                }
                (stored, true, added)
            }
            None => (Session::start(&template, date), false, Vec::new()),
        };

        let dirty = !resumed || !added_exercises.is_empty();
        *inner.lock_open() = Some(OpenSession::new(session.clone(), dirty, resumed));
        if dirty {
            inner.debouncer.touch();
        }

        if resumed {
            info!("Resumed session {}", key);
        } else {
            info!("Started session {}", key);
        }
        inner.emit(SessionEvent::Started {
            key,
            resumed,
        });

        Ok(Started {
            session,
            resumed,
            added_exercises,
        })
    }

    /// Writes pending edits now instead of waiting for the debounce window.
    pub async fn flush(&self) -> SessionResult<()> {
        self.inner.persist(false).await
    }

    /// Flushes and releases the open session without deleting its record.
    pub async fn close(&self) -> SessionResult<()> {
        self.inner.persist(false).await?;
        let _guard = self.inner.persist_lock.lock().await;
        *self.inner.lock_open() = None;
        Ok(())
    }

    /// Commits the open session as a [`Workout`].
    ///
    /// The workout is written before the session record is deleted. A
    /// second completion for the same key updates the stored workout.
    pub async fn complete(&self) -> SessionResult<Workout> {
        let inner = &self.inner;
        let _guard = inner.persist_lock.lock().await;

        let (session, stored) = inner
            .lock_open()
            .as_ref()
            .map(|open| (open.grid.session().clone(), open.stored))
            .ok_or(SessionError::NoOpenSession)?;
        let key = session.key();

        let template_name = inner
            .catalog
            .get(&session.template_key)
            .map(|t| t.name.clone())
            .unwrap_or_else(|| session.template_key.to_string());
        let mut workout = Workout::from_session(&session, template_name, Timestamp::now())
            .ok_or_else(|| SessionError::NoValidSets(key.clone()))?;

        inner.check_writer(&session, stored).await?;

        let workouts = inner.workouts.clone();
        let lookup = key.clone();
        match blocking(move || workouts.get(&lookup)).await {
            Ok(Some(existing)) => {
                debug!("Workout {} already recorded, updating it", key);
                workout.id = existing.id;
            }
            Ok(None) => {}
            Err(e) => warn!("Could not read existing workout {}, writing a new one: {}", key, e),
        }

        let workouts = inner.workouts.clone();
        let record = workout.clone();
        inner
            .with_retries("complete", RecordKey::workout(&key), &key, move || {
                workouts.put(&record)
            })
            .await?;

        let sessions = inner.sessions.clone();
        let lookup = key.clone();
        if let Err(e) = blocking(move || sessions.delete(&lookup)).await {
            warn!("Workout {} recorded but its session record remains: {}", key, e);
        }

        {
            let mut open = inner.lock_open();
            if open.as_ref().is_some_and(|o| o.grid.session().id == session.id) {
                *open = None;
            }
        }

        info!(
            "Completed session {} ({} sets, volume {})",
            key,
            workout.set_count(),
            workout.volume()
        );
        inner.emit(SessionEvent::Completed(workout.clone()));
        Ok(workout)
    }

    /// Deletes the open session without producing a workout. A no-op when
    /// nothing is open.
    pub async fn discard(&self) -> SessionResult<()> {
        let inner = &self.inner;
        let _guard = inner.persist_lock.lock().await;

        let Some((session, stored)) = inner
            .lock_open()
            .as_ref()
            .map(|open| (open.grid.session().clone(), open.stored))
        else {
            return Ok(());
        };
        let key = session.key();

        match inner.check_writer(&session, stored).await {
            Ok(()) => {
                inner.delete_session(&key).await?;
            }
            Err(SessionError::SessionRemoved { .. }) => {
                debug!("Session {} was already removed", key);
            }
            Err(e) => return Err(e),
        }
        *inner.lock_open() = None;

        info!("Discarded session {}", key);
        inner.emit(SessionEvent::Discarded(key));
        Ok(())
    }

    /// Deletes the stored session for `key`, closing it if it is open.
    /// Returns true if a record was removed.
    pub async fn discard_key(&self, key: &SessionKey) -> SessionResult<bool> {
        let inner = &self.inner;
        let _guard = inner.persist_lock.lock().await;

        let removed = inner.delete_session(key).await?;
        let was_open = {
            let mut open = inner.lock_open();
            let matches = open.as_ref().is_some_and(|o| &o.key() == key);
            if matches {
                *open = None;
            }
            matches
        };

        if removed || was_open {
            info!("Discarded session {}", key);
            inner.emit(SessionEvent::Discarded(key.clone()));
        }
        Ok(removed)
    }

    /// The session the user is working on: the open one if any, otherwise
    /// the most recently saved stored session. Records left over from an
    /// interrupted completion are removed on the way.
    pub async fn find_any_active_session(&self) -> SessionResult<Option<Session>> {
        if let Some(open) = self.snapshot() {
            return Ok(Some(open));
        }

        let sessions = self.inner.sessions.clone();
        let workouts = self.inner.workouts.clone();
        let stored = blocking(move || {
            let mut active = Vec::new();
            for session in sessions.list()? {
                if is_leftover(&workouts, &session) {
                    info!("Removing session {} left over from a completed workout", session.key());
                    sessions.delete(&session.key())?;
                } else {
                    active.push(session);
                }
            }
            Ok(active)
        })
        .await
        .map_err(|source| SessionError::Persistence {
            operation: "find_active",
            key: SESSION_PREFIX.to_string(),
            source,
        })?;

        Ok(stored
            .into_iter()
            .max_by(|a, b| a.last_saved_at.cmp(&b.last_saved_at)))
    }

    // ── Concurrent-writer resolution ─────────────────────────────

    /// Writes the open session over whatever is stored after a
    /// [`SessionError::SessionConflict`], or re-creates a removed record
    /// after [`SessionError::SessionRemoved`].
    pub async fn keep_local(&self) -> SessionResult<()> {
        if self.current_key().is_none() {
            return Err(SessionError::NoOpenSession);
        }
        self.inner.persist(true).await
    }

    /// Replaces the open session with the stored record after a
    /// [`SessionError::SessionConflict`] or [`SessionError::SessionRemoved`].
    /// Returns `None` and closes the open session when the record is gone.
    pub async fn reload(&self) -> SessionResult<Option<Session>> {
        let inner = &self.inner;
        let _guard = inner.persist_lock.lock().await;

        let key = self.current_key().ok_or(SessionError::NoOpenSession)?;
        let sessions = inner.sessions.clone();
        let lookup = key.clone();
        let stored = blocking(move || sessions.get(&lookup))
            .await
            .map_err(|source| SessionError::Persistence {
                operation: "reload",
                key: RecordKey::session(&key),
                source,
            })?;

        let Some(mut stored) = stored else {
            *inner.lock_open() = None;
            info!("Session {} no longer exists in storage, closed it", key);
            return Ok(None);
        };
        if let Some(template) = inner.catalog.get(&stored.template_key) {
            stored.align_with(template);
        }
        *inner.lock_open() = Some(OpenSession::new(stored.clone(), false, true));
        info!("Reloaded session {} from storage", key);
        Ok(Some(stored))
    }
}

impl Inner {
    fn lock_open(&self) -> MutexGuard<'_, Option<OpenSession>> {
        self.open.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    /// Writes the open session if it has unsaved edits. `force` skips the
    /// writer check and writes even a clean session.
    async fn persist(&self, force: bool) -> SessionResult<()> {
        let _guard = self.persist_lock.lock().await;

        let (mut session, revision, stored) = {
            let open = self.lock_open();
            match open.as_ref() {
                Some(o) if force || o.is_dirty() => (o.grid.session().clone(), o.revision, o.stored),
                _ => return Ok(()),
            }
        };
        let key = session.key();

        if !force {
            self.check_writer(&session, stored).await?;
        }

        session.last_saved_at = session.last_saved_at.tick();
        let sessions = self.sessions.clone();
        let record = session.clone();
        self.with_retries("persist", RecordKey::session(&key), &key, move || {
            sessions.put(&record)
        })
        .await?;

        {
            let mut open = self.lock_open();
            if let Some(o) = open.as_mut().filter(|o| o.grid.session().id == session.id) {
                o.persisted_revision = o.persisted_revision.max(revision);
                o.stored = true;
                o.grid.stamp_saved(session.last_saved_at);
            }
        }

        debug!("Persisted session {}", key);
        self.emit(SessionEvent::Persisted {
            key,
            at: session.last_saved_at,
        });
        Ok(())
    }

    /// Refuses the write when the stored record belongs to another
    /// session generation, or when it was removed after this generation
    /// had stored it.
    async fn check_writer(&self, session: &Session, expect_record: bool) -> SessionResult<()> {
        let key = session.key();
        let sessions = self.sessions.clone();
        let lookup = key.clone();

        let stored = match blocking(move || sessions.get(&lookup)).await {
            Ok(stored) => stored,
            Err(StorageError::InvalidRecord { key: raw, reason }) => {
                warn!("Overwriting unreadable session record {}: {}", raw, reason);
                return Ok(());
            }
            Err(source) => {
                return Err(SessionError::Persistence {
                    operation: "persist",
                    key: RecordKey::session(&key),
                    source,
                });
            }
        };

        match stored {
            Some(stored) if stored.id != session.id => {
                warn!(
                    "Session {} was replaced by another writer (open {}, stored {})",
                    key, session.id, stored.id
                );
                self.emit(SessionEvent::Conflict {
                    key: key.clone(),
                    local: session.id,
                    stored: Some(stored.id),
                });
                Err(SessionError::SessionConflict {
                    key,
                    local: session.id,
                    stored: stored.id,
                })
            }
            None if expect_record => {
                warn!("Session {} was removed by another writer", key);
                self.emit(SessionEvent::Conflict {
                    key: key.clone(),
                    local: session.id,
                    stored: None,
                });
                Err(SessionError::SessionRemoved {
                    key,
                    local: session.id,
                })
            }
            _ => Ok(()),
        }
    }

    /// Runs a durable write, retrying immediately up to the configured
    /// count before surfacing the failure.
    async fn with_retries<F>(
        &self,
        operation: &'static str,
        record_key: String,
        session_key: &SessionKey,
        write: F,
    ) -> SessionResult<()>
    where
        F: Fn() -> StorageResult<()> + Clone + Send + 'static,
    {
        let mut attempt = 0;
        loop {
            match blocking(write.clone()).await {
                Ok(()) => return Ok(()),
                Err(e) if attempt < self.config.persist_retries => {
                    attempt += 1;
                    warn!("{} of {} failed ({}), retrying", operation, record_key, e);
                }
                Err(source) => {
                    warn!("{} of {} failed: {}", operation, record_key, source);
                    self.emit(SessionEvent::PersistFailed {
                        key: session_key.clone(),
                        error: source.to_string(),
                    });
                    return Err(SessionError::Persistence {
                        operation,
                        key: record_key,
                        source,
                    });
                }
            }
        }
    }

    async fn delete_session(&self, key: &SessionKey) -> SessionResult<bool> {
        let sessions = self.sessions.clone();
        let lookup = key.clone();
        blocking(move || sessions.delete(&lookup))
            .await
            .map_err(|source| SessionError::Persistence {
                operation: "discard",
                key: RecordKey::session(key),
                source,
            })
    }

    /// Loads the stored session for a start. Read failures start fresh;
    /// the writer check on the first persist still guards the record.
    async fn load_for_start(&self, key: &SessionKey) -> Option<Session> {
        let sessions = self.sessions.clone();
        let workouts = self.workouts.clone();
        let lookup = key.clone();

        let loaded = blocking(move || {
            let Some(session) = sessions.get(&lookup)? else {
                return Ok(None);
            };
            if is_leftover(&workouts, &session) {
                info!("Removing session {} left over from a completed workout", lookup);
                sessions.delete(&lookup)?;
                return Ok(None);
            }
            Ok(Some(session))
        })
        .await;

        match loaded {
            Ok(session) => session,
            Err(e) => {
                warn!("Could not load session {}, starting fresh: {}", key, e);
                None
            }
        }
    }
}

/// True when a workout produced by this exact session is already stored.
fn is_leftover(workouts: &WorkoutArchive, session: &Session) -> bool {
    workouts
        .get(&session.key())
        .ok()
        .flatten()
        .is_some_and(|w| w.session_id == Some(session.id))
}

async fn blocking<T, F>(f: F) -> StorageResult<T>
where
    F: FnOnce() -> StorageResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| StorageError::WriteFailed(format!("store task failed: {e}")))?
}
