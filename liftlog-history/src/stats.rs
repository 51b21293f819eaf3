//! Whole-history statistics.

use crate::aggregator::HistoryAggregator;
use crate::analytics::one_rep_max;
use liftlog_types::{TemplateKey, WorkoutDate};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Totals across every indexed workout.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryStats {
    /// Distinct training days.
    pub total_workouts: usize,
    pub total_sets: usize,
    pub total_volume: f64,
    pub unique_exercises: usize,
    pub sets_per_exercise: BTreeMap<String, usize>,
    pub workouts_per_template: BTreeMap<TemplateKey, usize>,
    pub first_date: Option<WorkoutDate>,
    pub last_date: Option<WorkoutDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BestSet {
    pub date: WorkoutDate,
    pub weight: f64,
    pub reps: f64,
}

/// Summary of one exercise's history.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseSummary {
    pub exercise: String,
    /// Heaviest set; equal weights prefer more reps.
    pub best_set: Option<BestSet>,
    /// Highest Epley estimate over all sets. An estimate, not a lift.
    pub estimated_one_rep_max: f64,
    pub total_volume: f64,
    pub session_count: usize,
}

impl HistoryAggregator {
    pub fn stats(&self) -> HistoryStats {
        let mut stats = HistoryStats::default();
        let mut dates = BTreeSet::new();

        for workout in self.all().values() {
            dates.insert(workout.date);
            *stats
                .workouts_per_template
                .entry(workout.template_key.clone())
                .or_default() += 1;

            for log in &workout.exercises {
                let complete = log.complete_sets().count();
                if complete == 0 {
                    continue;
                }
                stats.total_sets += complete;
                stats.total_volume += log.volume();
                *stats
                    .sets_per_exercise
                    .entry(log.exercise.clone())
                    .or_default() += complete;
            }
        }

        stats.total_workouts = dates.len();
        stats.unique_exercises = stats.sets_per_exercise.len();
        stats.first_date = dates.first().copied();
        stats.last_date = dates.last().copied();
        stats
    }

    pub fn exercise_summary(&self, exercise: &str) -> ExerciseSummary {
        let points = self.progression(exercise);

        let best_set = points
            .iter()
            .max_by(|a, b| {
                a.weight
                    .total_cmp(&b.weight)
                    .then_with(|| a.reps.total_cmp(&b.reps))
            })
            .map(|p| BestSet {
                date: p.date,
                weight: p.weight,
                reps: p.reps,
            });
        let estimated_one_rep_max = points
            .iter()
            .map(|p| one_rep_max(p.weight, p.reps.round() as i32))
            .fold(0.0, f64::max);
        let session_count = points
            .iter()
            .map(|p| p.date)
            .collect::<BTreeSet<_>>()
            .len();

        ExerciseSummary {
            exercise: exercise.to_string(),
            best_set,
            estimated_one_rep_max,
            total_volume: points.iter().map(|p| p.volume).sum(),
            session_count,
        }
    }
}
