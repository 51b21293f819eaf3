//! History aggregation for Liftlog.
//!
//! [`HistoryAggregator`] indexes completed workouts and answers "what did
//! I do last time" queries for the open session, per-exercise progression,
//! next-weight suggestions and overall statistics.
//!
//! Only complete sets (weight and reps both present) contribute to any
//! figure computed here. Estimated one-rep maxes come from the Epley
//! formula and are estimates, not measurements.

mod aggregator;
mod analytics;
mod stats;

pub use aggregator::{DailyProgress, HistoryAggregator, LiveBest, ProgressionPoint};
pub use analytics::{one_rep_max, round_to_half, Suggestion, MIN_INCREMENT};
pub use stats::{BestSet, ExerciseSummary, HistoryStats};
