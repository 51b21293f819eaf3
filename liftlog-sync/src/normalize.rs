//! Conversion between the remote's sparse row log and dense workouts.
//!
//! Rows are grouped by (date, template) and exercise. Within an exercise,
//! sets are ordered by set number and renumbered from 1. The remote log is
//! append-only, so when a set number repeats the later row wins. Rows
//! without a usable set number follow the numbered ones in log order.

use crate::remote::RawRow;
use liftlog_types::{
    ExerciseLog, Set, SessionKey, Template, TemplateCatalog, Timestamp, Workout, WorkoutDate,
    WorkoutId, WorkoutSource,
};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Pounds per kilogram.
pub const LB_PER_KG: f64 = 2.2046226218;

/// Why a remote row was not imported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    MissingDate,
    InvalidDate(String),
    MissingTemplate,
    UnknownTemplate(String),
    MissingExercise,
    /// Weight missing, non-numeric or not positive.
    InvalidWeight(String),
    /// Reps missing, non-numeric or not positive.
    InvalidReps(String),
    /// The row belongs to a session still open on the remote.
    InProgress,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::MissingDate => f.write_str("missing date"),
            DropReason::InvalidDate(d) => write!(f, "invalid date {d:?}"),
            DropReason::MissingTemplate => f.write_str("missing template"),
            DropReason::UnknownTemplate(t) => write!(f, "unknown template {t:?}"),
            DropReason::MissingExercise => f.write_str("missing exercise"),
            DropReason::InvalidWeight(w) => write!(f, "invalid weight {w:?}"),
            DropReason::InvalidReps(r) => write!(f, "invalid reps {r:?}"),
            DropReason::InProgress => f.write_str("session still in progress"),
        }
    }
}

/// A row that was not imported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedRow {
    /// Position in the fetched batch.
    pub index: usize,
    pub row: RawRow,
    pub reason: DropReason,
}

/// Output of [`normalize_rows`].
#[derive(Debug, Clone, Default)]
pub struct NormalizedBatch {
    /// One workout per (date, template), in key order.
    pub workouts: Vec<Workout>,
    pub dropped: Vec<DroppedRow>,
}

struct ParsedSet {
    number: Option<u32>,
    index: usize,
    set: Set,
}

/// Groups valid rows into imported workouts tagged with `origin`.
pub fn normalize_rows(rows: &[RawRow], catalog: &TemplateCatalog, origin: &str) -> NormalizedBatch {
    let mut dropped = Vec::new();
    let mut grouped: BTreeMap<SessionKey, (Template, Vec<(String, Vec<ParsedSet>)>)> =
        BTreeMap::new();

    for (index, row) in rows.iter().enumerate() {
        let (date, template, set) = match validate(row, catalog) {
            Ok(valid) => valid,
            Err(reason) => {
                debug!("Dropping remote row {}: {}", index, reason);
                dropped.push(DroppedRow {
                    index,
                    row: row.clone(),
                    reason,
                });
                continue;
            }
        };

        let key = SessionKey::new(date, template.key.clone());
        let (_, exercises) = grouped
            .entry(key)
            .or_insert_with(|| (template.clone(), Vec::new()));
        let exercise = row.exercise.trim();
        let parsed = ParsedSet {
            number: row.set_number.trim().parse::<f64>().ok().and_then(set_number),
            index,
            set,
        };
        match exercises.iter_mut().find(|(name, _)| name == exercise) {
            Some((_, sets)) => sets.push(parsed),
            None => exercises.push((exercise.to_string(), vec![parsed])),
        }
    }

    let workouts = grouped
        .into_iter()
        .map(|(key, (template, exercises))| build_workout(key, &template, exercises, origin))
        .collect();

    NormalizedBatch { workouts, dropped }
}

fn validate<'a>(
    row: &RawRow,
    catalog: &'a TemplateCatalog,
) -> Result<(WorkoutDate, &'a Template, Set), DropReason> {
    if row
        .status
        .as_deref()
        .is_some_and(|s| s.trim().eq_ignore_ascii_case("active"))
    {
        return Err(DropReason::InProgress);
    }

    let date = row.date.trim();
    if date.is_empty() {
        return Err(DropReason::MissingDate);
    }
    let date = WorkoutDate::parse_loose(date).map_err(|_| DropReason::InvalidDate(row.date.clone()))?;

    let label = row.template_label.trim();
    if label.is_empty() {
        return Err(DropReason::MissingTemplate);
    }
    let template = catalog
        .resolve_label(label)
        .ok_or_else(|| DropReason::UnknownTemplate(label.to_string()))?;

    if row.exercise.trim().is_empty() {
        return Err(DropReason::MissingExercise);
    }

    let weight = parse_weight(&row.weight)
        .filter(|w| *w > 0.0)
        .ok_or_else(|| DropReason::InvalidWeight(row.weight.clone()))?;
    let reps = parse_reps(&row.reps)
        .filter(|r| *r > 0.0)
        .ok_or_else(|| DropReason::InvalidReps(row.reps.clone()))?;

    let mut set = Set::with_values(format_number(weight), format_number(reps));
    set.notes = row
        .notes
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string);
    set.saved = true;
    Ok((date, template, set))
}

fn set_number(n: f64) -> Option<u32> {
    (n.fract() == 0.0 && n >= 1.0 && n <= f64::from(u32::MAX)).then_some(n as u32)
}

fn build_workout(
    key: SessionKey,
    template: &Template,
    mut exercises: Vec<(String, Vec<ParsedSet>)>,
    origin: &str,
) -> Workout {
    // Template exercises first, in template order; ad hoc ones after.
    let position = |name: &str| {
        template
            .exercises
            .iter()
            .position(|e| e == name)
            .unwrap_or(usize::MAX)
    };
    exercises.sort_by_key(|(name, _)| position(name));

    let exercises = exercises
        .into_iter()
        .map(|(name, sets)| ExerciseLog::with_sets(name, order_sets(sets)))
        .collect();

    let completed_at = key
        .date
        .as_naive()
        .and_hms_opt(0, 0, 0)
        .map(|dt| Timestamp::from(dt.and_utc()))
        .unwrap_or_default();

    Workout {
        id: WorkoutId::new(),
        date: key.date,
        template_key: key.template_key,
        template_name: template.name.clone(),
        exercises,
        completed_at,
        source: WorkoutSource::Imported {
            origin: origin.to_string(),
        },
        session_id: None,
    }
}

fn order_sets(mut sets: Vec<ParsedSet>) -> Vec<Set> {
    sets.sort_by_key(|s| (s.number.unwrap_or(u32::MAX), s.index));

    let mut ordered: Vec<ParsedSet> = Vec::with_capacity(sets.len());
    for set in sets {
        match ordered.last_mut() {
            Some(prev) if prev.number.is_some() && prev.number == set.number => *prev = set,
            _ => ordered.push(set),
        }
    }
    ordered.into_iter().map(|s| s.set).collect()
}

/// Flattens a workout into remote rows, one per complete set, numbered
/// from 1.
pub fn rows_for_workout(workout: &Workout) -> Vec<RawRow> {
    let mut rows = Vec::new();
    for log in &workout.exercises {
        for (number, set) in log.complete_sets() {
            rows.push(RawRow {
                date: workout.date.to_string(),
                template_label: workout.template_key.to_string(),
                exercise: log.exercise.clone(),
                set_number: number.to_string(),
                weight: set.weight.trim().to_string(),
                reps: set.reps.trim().to_string(),
                notes: set.notes.clone(),
                status: Some("completed".to_string()),
            });
        }
    }
    rows
}

/// Parses a weight cell in pounds. A `kg` suffix converts to pounds,
/// rounded to 0.1; `lb`, `lbs` and `#` are accepted as-is.
pub fn parse_weight(raw: &str) -> Option<f64> {
    let cell = raw.trim().to_ascii_lowercase();
    let (number, kilos) = if let Some(n) = strip_unit(&cell, &["kgs", "kg", "kilograms", "kilos"]) {
        (n, true)
    } else if let Some(n) = strip_unit(&cell, &["lbs", "lb", "pounds", "#"]) {
        (n, false)
    } else {
        (cell.as_str(), false)
    };

    let value = number.trim().parse::<f64>().ok().filter(|v| v.is_finite())?;
    Some(if kilos {
        (value * LB_PER_KG * 10.0).round() / 10.0
    } else {
        value
    })
}

/// Parses a reps cell, tolerating whitespace and a trailing `reps`.
pub fn parse_reps(raw: &str) -> Option<f64> {
    let cell = raw.trim().to_ascii_lowercase();
    let number = strip_unit(&cell, &["reps", "rep"]).unwrap_or(&cell);
    number.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn strip_unit<'a>(cell: &'a str, units: &[&str]) -> Option<&'a str> {
    units.iter().find_map(|unit| cell.strip_suffix(unit))
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        let text = format!("{value:.2}");
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
