//! The exercise → sets grid of the open session.
//!
//! Every exercise keeps at least one set row while the session is open.
//! Set numbers are positions (`index + 1`), so removing a row renumbers
//! the rows after it.

use liftlog_types::{ExerciseLog, Session, Set, SetField, Timestamp};

/// Result of a successful [`SetStore::update_set`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetUpdate {
    pub exercise: String,
    /// 1-based position of the edited set.
    pub set_number: usize,
    /// The set after the edit.
    pub set: Set,
    /// True when the edit touched weight or reps and the set is now complete.
    pub completed: bool,
}

/// In-memory grid for one open session.
#[derive(Debug, Clone)]
pub struct SetStore {
    session: Session,
}

impl SetStore {
    /// Wraps a session, restoring a row for any exercise that has none.
    pub fn new(mut session: Session) -> Self {
        for log in &mut session.exercises {
            if log.sets.is_empty() {
                log.sets.push(Set::empty());
            }
        }
        Self { session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn exercise_data(&self) -> &[ExerciseLog] {
        &self.session.exercises
    }

    pub fn has_valid_sets(&self) -> bool {
        self.session.has_valid_sets()
    }

    /// Appends an empty set and returns its index. An exercise not yet in
    /// the grid is added as an ad hoc entry.
    pub fn add_set(&mut self, exercise: &str) -> usize {
        match self.log_mut(exercise) {
            Some(log) => {
                log.sets.push(Set::empty());
                log.sets.len() - 1
            }
            None => {
                self.session.exercises.push(ExerciseLog::new(exercise));
                0
            }
        }
    }

    /// Removes the set at `index`. Refused (returns false) when it is the
    /// exercise's last row or does not exist.
    pub fn remove_set(&mut self, exercise: &str, index: usize) -> bool {
        match self.log_mut(exercise) {
            Some(log) if log.sets.len() > 1 && index < log.sets.len() => {
                log.sets.remove(index);
                true
            }
            _ => false,
        }
    }

    /// Writes one field of a set. Returns `None` if the set does not exist.
    pub fn update_set(
        &mut self,
        exercise: &str,
        index: usize,
        field: SetField,
        value: impl Into<String>,
        at: Timestamp,
    ) -> Option<SetUpdate> {
        let log = self.log_mut(exercise)?;
        let set = log.sets.get_mut(index)?;
        set.apply(field, value, at);

        Some(SetUpdate {
            exercise: log.exercise.clone(),
            set_number: index + 1,
            completed: field != SetField::Notes && set.is_complete(),
            set: set.clone(),
        })
    }

    pub(crate) fn stamp_saved(&mut self, at: Timestamp) {
        self.session.last_saved_at = at;
    }

    fn log_mut(&mut self, exercise: &str) -> Option<&mut ExerciseLog> {
        self.session
            .exercises
            .iter_mut()
            .find(|log| log.exercise == exercise)
    }
}
