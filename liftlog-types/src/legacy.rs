//! One-time normalisation of older session record shapes.
//!
//! Early records stored exercises as a JSON object keyed by exercise name,
//! where each value was either an array of sets or a single set object,
//! and weight/reps were sometimes numbers. Those records are converted to
//! the current [`Session`] shape when read; nothing else in the crate
//! branches on the old format.
//!
//! Old records carry no generation id. One is derived from the record's
//! date and template, so every decode of the same record yields the same
//! id and the record keeps its identity until it is rewritten.

use crate::{Error, ExerciseLog, Result, Session, SessionId, Set, TemplateKey, Timestamp, WorkoutDate};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use uuid::Uuid;

/// Decodes a session record, accepting the current and the legacy shape.
pub fn decode_session(json: &str) -> Result<Session> {
    match serde_json::from_str::<Session>(json) {
        Ok(session) => Ok(session),
        Err(strict) => {
            let legacy: LegacySession =
                serde_json::from_str(json).map_err(|_| Error::Serialization(strict))?;
            Ok(legacy.into_session())
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacySession {
    #[serde(default)]
    id: Option<SessionId>,
    date: WorkoutDate,
    #[serde(alias = "template")]
    template_key: TemplateKey,
    #[serde(default)]
    exercises: serde_json::Map<String, Value>,
    #[serde(default)]
    last_saved_at: Option<Value>,
}

impl LegacySession {
    fn into_session(self) -> Session {
        let exercises = self
            .exercises
            .into_iter()
            .map(|(name, value)| {
                let mut sets = legacy_sets(value);
                if sets.is_empty() {
                    sets.push(Set::empty());
                }
                ExerciseLog::with_sets(name, sets)
            })
            .collect();

        let last_saved_at = match self.last_saved_at {
            Some(Value::Number(n)) => n.as_u64().map(Timestamp::from_millis),
            Some(other) => serde_json::from_value(other).ok(),
            None => None,
        }
        .unwrap_or_else(|| Timestamp::from_millis(0));

        let id = self
            .id
            .unwrap_or_else(|| legacy_id(self.date, &self.template_key));

        Session {
            id,
            date: self.date,
            template_key: self.template_key,
            exercises,
            last_saved_at,
        }
    }
}

/// Stable id for a record written before sessions had one.
fn legacy_id(date: WorkoutDate, template_key: &TemplateKey) -> SessionId {
    let name = format!("liftlog:session:{date}:{template_key}");
    SessionId::from_uuid(Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes()))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LegacySets {
    Many(Vec<LegacySet>),
    One(LegacySet),
}

#[derive(Deserialize)]
struct LegacySet {
    #[serde(default, deserialize_with = "lenient_string")]
    weight: String,
    #[serde(default, deserialize_with = "lenient_string")]
    reps: String,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    saved: bool,
}

fn legacy_sets(value: Value) -> Vec<Set> {
    let parsed = match serde_json::from_value::<LegacySets>(value) {
        Ok(sets) => sets,
        Err(_) => return Vec::new(),
    };
    let sets = match parsed {
        LegacySets::Many(sets) => sets,
        LegacySets::One(set) => vec![set],
    };
    sets.into_iter()
        .map(|s| Set {
            weight: s.weight,
            reps: s.reps,
            notes: s.notes.filter(|n| !n.trim().is_empty()),
            saved: s.saved,
            saved_at: None,
        })
        .collect()
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}
