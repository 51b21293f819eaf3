//! Domain events shared between the session and history layers.

use crate::{SessionKey, Set, Timestamp};
use serde::{Deserialize, Serialize};

/// A set gained (or changed) both weight and reps while a session was open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetCompleted {
    pub key: SessionKey,
    pub exercise: String,
    /// 1-based position within the exercise.
    pub set_number: usize,
    pub set: Set,
    pub at: Timestamp,
}

impl SetCompleted {
    pub fn weight(&self) -> Option<f64> {
        self.set.weight_value()
    }

    pub fn reps(&self) -> Option<f64> {
        self.set.reps_value()
    }
}
