//! Record key naming scheme.
//!
//! Keys embed the session identity so listing a prefix is enough to find
//! every session or workout without reading values. The date is always
//! ten characters (`YYYY-MM-DD`), which keeps parsing unambiguous even for
//! template keys that contain dashes.

use crate::error::{StorageError, StorageResult};
use liftlog_types::{SessionKey, TemplateKey, WorkoutDate};
use std::fmt;
use std::str::FromStr;

/// Prefix of in-progress session records.
pub const SESSION_PREFIX: &str = "session-";

/// Prefix of completed workout records.
pub const WORKOUT_PREFIX: &str = "workout-complete-";

const DATE_LEN: usize = 10;

/// A parsed record key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordKey {
    Session(SessionKey),
    Workout(SessionKey),
}

impl RecordKey {
    pub fn session(key: &SessionKey) -> String {
        Self::Session(key.clone()).to_string()
    }

    pub fn workout(key: &SessionKey) -> String {
        Self::Workout(key.clone()).to_string()
    }

    /// Returns the session identity the record belongs to.
    pub fn session_key(&self) -> &SessionKey {
        match self {
            RecordKey::Session(k) | RecordKey::Workout(k) => k,
        }
    }

    /// Parses a raw key.
    pub fn parse(raw: &str) -> StorageResult<Self> {
        if let Some(rest) = raw.strip_prefix(WORKOUT_PREFIX) {
            return parse_identity(raw, rest).map(RecordKey::Workout);
        }
        if let Some(rest) = raw.strip_prefix(SESSION_PREFIX) {
            return parse_identity(raw, rest).map(RecordKey::Session);
        }
        Err(StorageError::InvalidKey(raw.to_string()))
    }
}

fn parse_identity(raw: &str, rest: &str) -> StorageResult<SessionKey> {
    let invalid = || StorageError::InvalidKey(raw.to_string());

    let date_part = rest.get(..DATE_LEN).ok_or_else(invalid)?;
    let template_part = rest
        .get(DATE_LEN..)
        .and_then(|t| t.strip_prefix('-'))
        .filter(|t| !t.is_empty())
        .ok_or_else(invalid)?;

    let date = WorkoutDate::parse(date_part).map_err(|_| invalid())?;
    Ok(SessionKey::new(date, TemplateKey::new(template_part)))
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKey::Session(k) => write!(f, "{SESSION_PREFIX}{}-{}", k.date, k.template_key),
            RecordKey::Workout(k) => write!(f, "{WORKOUT_PREFIX}{}-{}", k.date, k.template_key),
        }
    }
}

impl FromStr for RecordKey {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
