//! Calendar dates of sessions and workouts.
//!
//! Internally every date is a `YYYY-MM-DD` calendar day. Rows coming from
//! the remote log use whatever format the spreadsheet happened to hold, so
//! [`WorkoutDate::parse_loose`] accepts the common variants and normalises
//! them once at the boundary.

use crate::{Error, Result};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const CANONICAL_FORMAT: &str = "%Y-%m-%d";

/// Date-only formats tried in order by [`WorkoutDate::parse_loose`].
/// US month-first wins over day-first when both would parse.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%d/%m/%Y",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// A calendar day, rendered as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkoutDate(NaiveDate);

impl WorkoutDate {
    /// Wraps a chrono date.
    #[must_use]
    pub const fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Builds a date from year, month and day. Returns `None` for
    /// impossible dates.
    #[must_use]
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Today in the local time zone.
    #[must_use]
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    /// Returns the underlying chrono date.
    #[must_use]
    pub const fn as_naive(&self) -> NaiveDate {
        self.0
    }

    /// Parses the canonical `YYYY-MM-DD` form only.
    pub fn parse(s: &str) -> Result<Self> {
        NaiveDate::parse_from_str(s.trim(), CANONICAL_FORMAT)
            .map(Self)
            .map_err(|_| Error::InvalidDate(s.to_string()))
    }

    /// Parses any of the date formats found in historical logs.
    ///
    /// Accepts the canonical form, slash/dash/dot separated US and
    /// European orders, spelled-out month names, date-times (time part
    /// discarded) and Unix timestamps in seconds.
    pub fn parse_loose(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidDate(s.to_string()));
        }

        for fmt in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
                return Ok(Self(date));
            }
        }

        for fmt in DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
                return Ok(Self(dt.date()));
            }
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Self(dt.date_naive()));
        }

        if trimmed.len() >= 9 && trimmed.chars().all(|c| c.is_ascii_digit()) {
            if let Some(dt) = trimmed
                .parse::<i64>()
                .ok()
                .and_then(|secs| DateTime::from_timestamp(secs, 0))
            {
                return Ok(Self(dt.date_naive()));
            }
        }

        Err(Error::InvalidDate(s.to_string()))
    }
}

impl fmt::Display for WorkoutDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(CANONICAL_FORMAT))
    }
}

impl FromStr for WorkoutDate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<NaiveDate> for WorkoutDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}
