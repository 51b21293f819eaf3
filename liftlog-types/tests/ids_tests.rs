use liftlog_types::{SessionId, WorkoutId};
use std::collections::HashSet;
use std::str::FromStr;

// ── SessionId ─────────────────────────────────────────────────────

#[test]
fn session_id_new_is_unique() {
    let a = SessionId::new();
    let b = SessionId::new();
    assert_ne!(a, b);
}

#[test]
fn session_ids_sort_by_creation() {
    let a = SessionId::new();
    let b = SessionId::new();
    assert!(a < b);
}

#[test]
fn session_id_display_and_parse() {
    let id = SessionId::new();
    let parsed = SessionId::parse(&id.to_string()).unwrap();
    assert_eq!(id, parsed);
}

#[test]
fn session_id_from_str_invalid() {
    assert!(SessionId::from_str("garbage").is_err());
}

#[test]
fn session_id_serializes_as_plain_string() {
    let id = SessionId::new();
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, format!("\"{id}\""));
}

// ── WorkoutId ─────────────────────────────────────────────────────

#[test]
fn workout_id_from_uuid_roundtrip() {
    let uuid = uuid::Uuid::now_v7();
    let id = WorkoutId::from_uuid(uuid);
    assert_eq!(id.as_uuid(), uuid);
}

#[test]
fn workout_id_parse_invalid() {
    assert!(WorkoutId::parse("not-a-uuid").is_err());
}

#[test]
fn workout_id_hash_and_eq() {
    let id = WorkoutId::new();
    let mut set = HashSet::new();
    set.insert(id);
    set.insert(id);
    assert_eq!(set.len(), 1);
}
