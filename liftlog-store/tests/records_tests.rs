use liftlog_store::{KvStore, MemoryStore, SessionRecords, StorageError, WorkoutArchive};
use liftlog_types::{
    Session, SessionKey, Set, Template, Timestamp, Workout, WorkoutDate, WorkoutSource,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn upper1() -> Template {
    Template::new("upper1", "Upper 1", ["Bench Press", "Row"])
}

fn day(d: u32) -> WorkoutDate {
    WorkoutDate::from_ymd(2024, 5, d).unwrap()
}

fn workout_on(d: u32) -> Workout {
    let mut session = Session::start(&upper1(), day(d));
    session.exercises[0].sets[0] = Set::with_values("185", "8");
    Workout::from_session(&session, "Upper 1", Timestamp::from_millis(d as u64 * 1000)).unwrap()
}

// ── SessionRecords ───────────────────────────────────────────────

#[test]
fn session_put_get_delete() {
    let store = Arc::new(MemoryStore::new());
    let sessions = SessionRecords::new(store.clone());
    let session = Session::start(&upper1(), day(1));

    sessions.put(&session).unwrap();
    assert!(store.contains("session-2024-05-01-upper1").unwrap());
    assert_eq!(sessions.get(&session.key()).unwrap(), Some(session.clone()));

    assert!(sessions.delete(&session.key()).unwrap());
    assert_eq!(sessions.get(&session.key()).unwrap(), None);
}

#[test]
fn session_get_normalises_legacy_records() {
    let store = Arc::new(MemoryStore::new());
    store
        .set(
            "session-2024-05-01-upper1",
            r#"{"date":"2024-05-01","template":"upper1",
                "exercises":{"Bench Press":{"weight":185,"reps":8}},
                "lastSavedAt":1714560000000}"#,
        )
        .unwrap();

    let sessions = SessionRecords::new(store);
    let key = SessionKey::new(day(1), "upper1");
    let session = sessions.get(&key).unwrap().unwrap();
    assert_eq!(session.exercises[0].sets[0].weight, "185");
    assert_eq!(session.last_saved_at.wall_time(), 1_714_560_000_000);
}

#[test]
fn session_get_reports_undecodable_record() {
    let store = Arc::new(MemoryStore::new());
    store.set("session-2024-05-01-upper1", "not json").unwrap();

    let sessions = SessionRecords::new(store);
    let err = sessions.get(&SessionKey::new(day(1), "upper1")).unwrap_err();
    assert!(matches!(err, StorageError::InvalidRecord { key, .. } if key == "session-2024-05-01-upper1"));
}

#[test]
fn list_skips_garbage_records() {
    let store = Arc::new(MemoryStore::new());
    let sessions = SessionRecords::new(store.clone());

    let mut older = Session::start(&upper1(), day(1));
    older.last_saved_at = Timestamp::from_millis(10);
    let mut newer = Session::start(&Template::new("lower1", "Lower 1", ["Squat"]), day(1));
    newer.last_saved_at = Timestamp::from_millis(20);
    sessions.put(&older).unwrap();
    sessions.put(&newer).unwrap();
    store.set("session-2024-05-03-upper2", "garbage").unwrap();

    let mut ids: Vec<_> = sessions.list().unwrap().into_iter().map(|s| s.id).collect();
    ids.sort();
    let mut expected = vec![older.id, newer.id];
    expected.sort();
    assert_eq!(ids, expected);
}

// ── WorkoutArchive ───────────────────────────────────────────────

#[test]
fn workout_put_replaces_same_key() {
    let store = Arc::new(MemoryStore::new());
    let archive = WorkoutArchive::new(store.clone());

    let first = workout_on(1);
    let mut second = workout_on(1);
    second.source = WorkoutSource::Imported {
        origin: "sheet".into(),
    };
    archive.put(&first).unwrap();
    archive.put(&second).unwrap();

    assert_eq!(store.list_keys_with_prefix("workout-complete-").unwrap().len(), 1);
    assert_eq!(archive.get(&first.key()).unwrap(), Some(second));
}

#[test]
fn workout_list_is_chronological() {
    let archive = WorkoutArchive::new(Arc::new(MemoryStore::new()));
    for d in [3, 1, 2] {
        archive.put(&workout_on(d)).unwrap();
    }
    let dates: Vec<_> = archive.list().unwrap().into_iter().map(|w| w.date).collect();
    assert_eq!(dates, vec![day(1), day(2), day(3)]);
}

#[test]
fn workout_contains_and_delete() {
    let archive = WorkoutArchive::new(Arc::new(MemoryStore::new()));
    let workout = workout_on(4);
    assert!(!archive.contains(&workout.key()).unwrap());
    archive.put(&workout).unwrap();
    assert!(archive.contains(&workout.key()).unwrap());
    assert!(archive.delete(&workout.key()).unwrap());
    assert!(!archive.contains(&workout.key()).unwrap());
}
