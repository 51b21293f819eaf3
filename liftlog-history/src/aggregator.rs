//! Workout index and prior-performance lookups.

use crate::analytics::{self, Suggestion};
use liftlog_store::{StorageResult, WorkoutArchive};
use liftlog_types::{
    SessionKey, Set, SetCompleted, TemplateKey, Workout, WorkoutDate,
};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// One complete set of an exercise in a completed workout.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressionPoint {
    pub date: WorkoutDate,
    pub set_number: usize,
    pub weight: f64,
    pub reps: f64,
    pub volume: f64,
}

/// Per-date totals for an exercise.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyProgress {
    pub date: WorkoutDate,
    pub sets: usize,
    pub top_weight: f64,
    pub total_reps: f64,
    pub volume: f64,
}

/// Heaviest set logged for an exercise in the open session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveBest {
    pub key: SessionKey,
    pub set_number: usize,
    pub weight: f64,
    pub reps: f64,
}

/// Index of completed workouts, one per (date, template).
#[derive(Debug, Clone, Default)]
pub struct HistoryAggregator {
    workouts: BTreeMap<SessionKey, Workout>,
    /// Latest numeric value of each set in the open session, by
    /// (exercise, set number).
    live: HashMap<(String, usize), LiveBest>,
}

impl HistoryAggregator {
    pub fn new(workouts: impl IntoIterator<Item = Workout>) -> Self {
        let mut aggregator = Self::default();
        for workout in workouts {
            aggregator.index(workout);
        }
        aggregator
    }

    /// Builds the index from every stored workout. Blocking.
    pub fn load(archive: &WorkoutArchive) -> StorageResult<Self> {
        let aggregator = Self::new(archive.list()?);
        debug!("Indexed {} workouts", aggregator.len());
        Ok(aggregator)
    }

    /// Adds a workout, replacing any workout with the same key. Live bests
    /// recorded for that session are cleared.
    pub fn index(&mut self, workout: Workout) {
        let key = workout.key();
        self.live.retain(|_, best| best.key != key);
        if self.workouts.insert(key.clone(), workout).is_some() {
            debug!("Replaced workout {}", key);
        }
    }

    pub fn len(&self) -> usize {
        self.workouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }

    /// Workouts in date order.
    pub fn workouts(&self) -> impl Iterator<Item = &Workout> {
        self.workouts.values()
    }

    // ── Last time ────────────────────────────────────────────────

    /// Most recent workout for `template` strictly before `excluding_date`.
    /// Equal dates prefer the later completion.
    pub fn previous_workout(
        &self,
        template: &TemplateKey,
        excluding_date: WorkoutDate,
    ) -> Option<&Workout> {
        self.workouts
            .values()
            .filter(|w| &w.template_key == template && w.date < excluding_date)
            .max_by(|a, b| {
                a.date
                    .cmp(&b.date)
                    .then_with(|| a.completed_at.cmp(&b.completed_at))
            })
    }

    /// The set at the same position in the previous workout. For display
    /// reference only.
    pub fn previous_set(
        &self,
        template: &TemplateKey,
        exercise: &str,
        set_index: usize,
        excluding_date: WorkoutDate,
    ) -> Option<&Set> {
        self.previous_workout(template, excluding_date)?
            .exercise(exercise)?
            .sets
            .get(set_index)
    }

    // ── Progression ──────────────────────────────────────────────

    /// Every complete numeric set of `exercise`, oldest first.
    pub fn progression(&self, exercise: &str) -> Vec<ProgressionPoint> {
        let mut points = Vec::new();
        for workout in self.workouts.values() {
            let Some(log) = workout.exercise(exercise) else {
                continue;
            };
            for (set_number, set) in log.complete_sets() {
                if let (Some(weight), Some(reps)) = (set.weight_value(), set.reps_value()) {
                    points.push(ProgressionPoint {
                        date: workout.date,
                        set_number,
                        weight,
                        reps,
                        volume: weight * reps,
                    });
                }
            }
        }
        points
    }

    /// [`progression`](Self::progression) summed per date.
    pub fn daily_progression(&self, exercise: &str) -> Vec<DailyProgress> {
        let mut days: Vec<DailyProgress> = Vec::new();
        for point in self.progression(exercise) {
            match days.last_mut() {
                Some(day) if day.date == point.date => {
                    day.sets += 1;
                    day.top_weight = day.top_weight.max(point.weight);
                    day.total_reps += point.reps;
                    day.volume += point.volume;
                }
                _ => days.push(DailyProgress {
                    date: point.date,
                    sets: 1,
                    top_weight: point.weight,
                    total_reps: point.reps,
                    volume: point.volume,
                }),
            }
        }
        days
    }

    /// Suggests the next working weight from the top weight of the last
    /// three sessions that included `exercise`.
    pub fn suggest_next_weight(&self, exercise: &str, target_reps: u32) -> Suggestion {
        let weights: Vec<f64> = self
            .daily_progression(exercise)
            .iter()
            .map(|day| day.top_weight)
            .collect();
        analytics::suggest(&weights, target_reps)
    }

    // ── Live tracking ────────────────────────────────────────────

    /// Records a set completed in the open session. A later event for the
    /// same set replaces the earlier value, so a corrected typo no longer
    /// counts. Events from another session drop what was tracked before.
    pub fn observe(&mut self, event: &SetCompleted) {
        self.live.retain(|_, best| best.key == event.key);
        let slot = (event.exercise.clone(), event.set_number);

        let (Some(weight), Some(reps)) = (event.weight(), event.reps()) else {
            self.live.remove(&slot);
            return;
        };
        self.live.insert(
            slot,
            LiveBest {
                key: event.key.clone(),
                set_number: event.set_number,
                weight,
                reps,
            },
        );
    }

    /// Heaviest set observed for `exercise` in the open session; equal
    /// weights prefer more reps, then the earlier set.
    pub fn session_best(&self, exercise: &str) -> Option<&LiveBest> {
        self.live
            .iter()
            .filter(|((name, _), _)| name == exercise)
            .map(|(_, best)| best)
            .max_by(|a, b| {
                a.weight
                    .total_cmp(&b.weight)
                    .then_with(|| a.reps.total_cmp(&b.reps))
                    .then_with(|| b.set_number.cmp(&a.set_number))
            })
    }

    pub(crate) fn all(&self) -> &BTreeMap<SessionKey, Workout> {
        &self.workouts
    }
}
