//! In-progress sessions.

use crate::{ExerciseLog, SessionId, Template, TemplateKey, Timestamp, WorkoutDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a session or workout: one per template per day.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionKey {
    pub date: WorkoutDate,
    pub template_key: TemplateKey,
}

impl SessionKey {
    pub fn new(date: WorkoutDate, template_key: impl Into<TemplateKey>) -> Self {
        Self {
            date,
            template_key: template_key.into(),
        }
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.date, self.template_key)
    }
}

/// A mutable, in-progress workout for one (date, template) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: SessionId,
    pub date: WorkoutDate,
    pub template_key: TemplateKey,
    pub exercises: Vec<ExerciseLog>,
    pub last_saved_at: Timestamp,
}

impl Session {
    /// A fresh session with one empty set row per template exercise.
    pub fn start(template: &Template, date: WorkoutDate) -> Self {
        Self {
            id: SessionId::new(),
            date,
            template_key: template.key.clone(),
            exercises: template.exercises.iter().map(ExerciseLog::new).collect(),
            last_saved_at: Timestamp::now(),
        }
    }

    pub fn key(&self) -> SessionKey {
        SessionKey::new(self.date, self.template_key.clone())
    }

    pub fn exercise(&self, name: &str) -> Option<&ExerciseLog> {
        self.exercises.iter().find(|e| e.exercise == name)
    }

    /// True iff at least one set anywhere has both weight and reps.
    pub fn has_valid_sets(&self) -> bool {
        self.exercises.iter().any(ExerciseLog::has_complete_set)
    }

    /// Aligns a resumed session with the current template definition.
    ///
    /// Exercises the template gained are appended as empty rows. Exercises
    /// the template dropped are kept as ad hoc entries so no logged data
    /// disappears. Returns the names of the exercises that were added.
    pub fn align_with(&mut self, template: &Template) -> Vec<String> {
        let mut added = Vec::new();
        for name in &template.exercises {
            if self.exercise(name).is_none() {
                self.exercises.push(ExerciseLog::new(name.clone()));
                added.push(name.clone());
            }
        }
        for log in &mut self.exercises {
            if log.sets.is_empty() {
                log.sets.push(crate::Set::empty());
            }
        }
        added
    }

    /// Exercises present in the session but not in the template.
    pub fn ad_hoc_exercises<'a>(&'a self, template: &'a Template) -> impl Iterator<Item = &'a str> {
        self.exercises
            .iter()
            .map(|e| e.exercise.as_str())
            .filter(move |name| !template.contains(name))
    }
}
