//! Completed workouts.

use crate::{ExerciseLog, Session, SessionId, SessionKey, TemplateKey, Timestamp, WorkoutDate, WorkoutId};
use serde::{Deserialize, Serialize};

/// Where a workout record came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum WorkoutSource {
    /// Completed in the app.
    Manual,
    /// Pulled from a remote historical store.
    Imported {
        /// Provider name of the remote store.
        origin: String,
    },
}

impl WorkoutSource {
    pub fn is_manual(&self) -> bool {
        matches!(self, WorkoutSource::Manual)
    }
}

/// An immutable record of a completed session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: WorkoutId,
    pub date: WorkoutDate,
    pub template_key: TemplateKey,
    pub template_name: String,
    /// Only complete sets; exercises without any are omitted.
    pub exercises: Vec<ExerciseLog>,
    pub completed_at: Timestamp,
    pub source: WorkoutSource,
    /// The session that produced this workout, for manual completions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
}

impl Workout {
    /// Builds the workout for a session, keeping only complete sets.
    /// Returns `None` when the session has no complete set.
    pub fn from_session(
        session: &Session,
        template_name: impl Into<String>,
        completed_at: Timestamp,
    ) -> Option<Self> {
        let exercises: Vec<ExerciseLog> = session
            .exercises
            .iter()
            .map(ExerciseLog::completed_only)
            .filter(|log| !log.sets.is_empty())
            .collect();
        if exercises.is_empty() {
            return None;
        }
        Some(Self {
            id: WorkoutId::new(),
            date: session.date,
            template_key: session.template_key.clone(),
            template_name: template_name.into(),
            exercises,
            completed_at,
            source: WorkoutSource::Manual,
            session_id: Some(session.id),
        })
    }

    pub fn key(&self) -> SessionKey {
        SessionKey::new(self.date, self.template_key.clone())
    }

    pub fn exercise(&self, name: &str) -> Option<&ExerciseLog> {
        self.exercises.iter().find(|e| e.exercise == name)
    }

    /// Number of complete sets across all exercises.
    pub fn set_count(&self) -> usize {
        self.exercises
            .iter()
            .map(|e| e.sets.iter().filter(|s| s.is_complete()).count())
            .sum()
    }

    /// Total volume across all exercises.
    pub fn volume(&self) -> f64 {
        self.exercises.iter().map(ExerciseLog::volume).sum()
    }
}
