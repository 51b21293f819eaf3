//! Strength formulas.

use serde::Serialize;

/// Smallest increase ever suggested.
pub const MIN_INCREMENT: f64 = 2.5;

/// Epley one-rep max estimate.
///
/// `reps <= 0` gives 0 and a single rep gives the weight itself; otherwise
/// `weight × (1 + reps / 30)` rounded to the nearest whole number.
pub fn one_rep_max(weight: f64, reps: i32) -> f64 {
    match reps {
        r if r <= 0 => 0.0,
        1 => weight,
        r => (weight * (1.0 + f64::from(r) / 30.0)).round(),
    }
}

/// Rounds to the nearest 0.5.
pub fn round_to_half(value: f64) -> f64 {
    (value * 2.0).round() / 2.0
}

/// Next-weight suggestion for an exercise.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Suggestion {
    /// No history: any starting weight.
    NoData,
    /// One prior session: repeat its weight.
    #[serde(rename_all = "camelCase")]
    Repeat { weight: f64, target_reps: u32 },
    /// Progress from the last session's top weight.
    #[serde(rename_all = "camelCase")]
    Increase {
        last_weight: f64,
        weight: f64,
        average_delta: f64,
        target_reps: u32,
    },
}

impl Suggestion {
    /// The suggested weight, if any.
    pub fn weight(&self) -> Option<f64> {
        match self {
            Suggestion::NoData => None,
            Suggestion::Repeat { weight, .. } | Suggestion::Increase { weight, .. } => Some(*weight),
        }
    }
}

/// Builds a suggestion from per-session top weights, oldest first.
pub(crate) fn suggest(session_weights: &[f64], target_reps: u32) -> Suggestion {
    let recent = &session_weights[session_weights.len().saturating_sub(3)..];
    match recent {
        [] => Suggestion::NoData,
        [only] => Suggestion::Repeat {
            weight: *only,
            target_reps,
        },
        [.., last] => {
            let deltas: Vec<f64> = recent.windows(2).map(|w| w[1] - w[0]).collect();
            let average_delta = deltas.iter().sum::<f64>() / deltas.len() as f64;
            Suggestion::Increase {
                last_weight: *last,
                weight: round_to_half(last + average_delta.max(MIN_INCREMENT)),
                average_delta,
                target_reps,
            }
        }
    }
}
