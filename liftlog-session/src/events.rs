use liftlog_types::{SessionId, SessionKey, SetCompleted, Timestamp, Workout};

/// Notifications published by the [`SessionRepository`](crate::SessionRepository).
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A session was opened.
    Started { key: SessionKey, resumed: bool },
    /// A set gained both weight and reps.
    SetCompleted(SetCompleted),
    /// The open session reached durable storage.
    Persisted { key: SessionKey, at: Timestamp },
    /// A durable write failed after retries. In-memory state is kept.
    PersistFailed { key: SessionKey, error: String },
    /// The stored record belongs to another session generation, or was
    /// removed (`stored` is `None`).
    Conflict {
        key: SessionKey,
        local: SessionId,
        stored: Option<SessionId>,
    },
    /// The session was committed as a workout.
    Completed(Workout),
    /// The session record was removed without producing a workout.
    Discarded(SessionKey),
}
