//! Sets and per-exercise set logs.
//!
//! Weight and reps are kept as the strings the user typed. A set is
//! *complete* when both are non-empty after trimming; only complete sets
//! count towards aggregates or leave the device.

use crate::{Error, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One logged attempt at an exercise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Set {
    #[serde(default)]
    pub weight: String,
    #[serde(default)]
    pub reps: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub saved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<Timestamp>,
}

impl Set {
    /// Creates an empty, unsaved set row.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a set with weight and reps filled in.
    pub fn with_values(weight: impl Into<String>, reps: impl Into<String>) -> Self {
        Self {
            weight: weight.into(),
            reps: reps.into(),
            ..Self::default()
        }
    }

    /// True iff both weight and reps are non-empty after trimming.
    pub fn is_complete(&self) -> bool {
        !self.weight.trim().is_empty() && !self.reps.trim().is_empty()
    }

    /// Parsed weight, if the field holds a number.
    pub fn weight_value(&self) -> Option<f64> {
        parse_number(&self.weight)
    }

    /// Parsed reps, if the field holds a number.
    pub fn reps_value(&self) -> Option<f64> {
        parse_number(&self.reps)
    }

    /// weight × reps for a complete set with numeric fields, 0 otherwise.
    pub fn volume(&self) -> f64 {
        if !self.is_complete() {
            return 0.0;
        }
        match (self.weight_value(), self.reps_value()) {
            (Some(w), Some(r)) => w * r,
            _ => 0.0,
        }
    }

    /// Writes one field and stamps the set as saved.
    pub fn apply(&mut self, field: SetField, value: impl Into<String>, at: Timestamp) {
        let value = value.into();
        match field {
            SetField::Weight => self.weight = value,
            SetField::Reps => self.reps = value,
            SetField::Notes => {
                self.notes = if value.trim().is_empty() {
                    None
                } else {
                    Some(value)
                }
            }
        }
        self.saved = true;
        self.saved_at = Some(at);
    }
}

fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// An editable field of a [`Set`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SetField {
    Weight,
    Reps,
    Notes,
}

impl fmt::Display for SetField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SetField::Weight => "weight",
            SetField::Reps => "reps",
            SetField::Notes => "notes",
        })
    }
}

impl FromStr for SetField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weight" => Ok(SetField::Weight),
            "reps" => Ok(SetField::Reps),
            "notes" => Ok(SetField::Notes),
            other => Err(Error::InvalidField(other.to_string())),
        }
    }
}

/// Ordered sets of one exercise. Index 0 is displayed as set number 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseLog {
    pub exercise: String,
    #[serde(default)]
    pub sets: Vec<Set>,
}

impl ExerciseLog {
    /// A log with a single empty set row.
    pub fn new(exercise: impl Into<String>) -> Self {
        Self {
            exercise: exercise.into(),
            sets: vec![Set::empty()],
        }
    }

    /// A log with the given sets.
    pub fn with_sets(exercise: impl Into<String>, sets: Vec<Set>) -> Self {
        Self {
            exercise: exercise.into(),
            sets,
        }
    }

    /// Iterates over complete sets with their 1-based set numbers.
    pub fn complete_sets(&self) -> impl Iterator<Item = (usize, &Set)> {
        self.sets
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_complete())
            .map(|(i, s)| (i + 1, s))
    }

    pub fn has_complete_set(&self) -> bool {
        self.sets.iter().any(Set::is_complete)
    }

    /// Total volume over complete sets.
    pub fn volume(&self) -> f64 {
        self.sets.iter().map(Set::volume).sum()
    }

    /// Heaviest numeric weight among complete sets.
    pub fn max_weight(&self) -> Option<f64> {
        self.sets
            .iter()
            .filter(|s| s.is_complete())
            .filter_map(Set::weight_value)
            .fold(None, |max, w| match max {
                Some(m) if m >= w => Some(m),
                _ => Some(w),
            })
    }

    /// Copy of this log keeping only complete sets.
    pub fn completed_only(&self) -> Self {
        Self {
            exercise: self.exercise.clone(),
            sets: self.sets.iter().filter(|s| s.is_complete()).cloned().collect(),
        }
    }
}
