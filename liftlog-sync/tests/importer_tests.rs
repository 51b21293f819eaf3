use liftlog_store::{KvStore, MemoryStore, RecordKey, WorkoutArchive};
use liftlog_sync::remote::mock::MockRemote;
use liftlog_sync::{Importer, RawRow, RetryPolicy, SyncError};
use liftlog_types::{
    ExerciseLog, Set, SessionKey, TemplateCatalog, Timestamp, Workout, WorkoutDate, WorkoutId,
    WorkoutSource,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn row(date: &str, template: &str, exercise: &str, set: &str, weight: &str, reps: &str) -> RawRow {
    RawRow {
        date: date.into(),
        template_label: template.into(),
        exercise: exercise.into(),
        set_number: set.into(),
        weight: weight.into(),
        reps: reps.into(),
        ..RawRow::default()
    }
}

fn history() -> Vec<RawRow> {
    vec![
        row("2024-01-15", "Upper 1", "Pec dec fly", "1", "120", "12"),
        row("2024-01-15", "Upper 1", "Pec dec fly", "2", "130", "10"),
        row("2024-01-17", "Lower 1", "Flat bench press DB", "1", "60", "10"),
        row("2024-01-17", "Lower 1", "", "2", "60", "9"),
    ]
}

fn key(date: &str, template: &str) -> SessionKey {
    SessionKey::new(WorkoutDate::parse(date).unwrap(), template)
}

struct Fixture {
    store: Arc<MemoryStore>,
    archive: WorkoutArchive,
    remote: Arc<MockRemote>,
    importer: Importer,
}

fn fixture(remote: MockRemote) -> Fixture {
    let store = Arc::new(MemoryStore::new());
    let archive = WorkoutArchive::new(store.clone());
    let remote = Arc::new(remote);
    let importer = Importer::new(
        remote.clone(),
        archive.clone(),
        TemplateCatalog::builtin(),
        RetryPolicy::default(),
    );
    Fixture {
        store,
        archive,
        remote,
        importer,
    }
}

fn manual_workout(date: &str) -> Workout {
    Workout {
        id: WorkoutId::new(),
        date: WorkoutDate::parse(date).unwrap(),
        template_key: "upper1".into(),
        template_name: "Upper 1".into(),
        exercises: vec![ExerciseLog::with_sets(
            "Pec dec fly",
            vec![Set::with_values("140", "8")],
        )],
        completed_at: Timestamp::now(),
        source: WorkoutSource::Manual,
        session_id: None,
    }
}

// ── Import ───────────────────────────────────────────────────────

#[tokio::test]
async fn imports_new_workouts() {
    let f = fixture(MockRemote::new(history()).with_name("gym-sheet"));

    let report = f.importer.import().await.unwrap();

    assert_eq!(report.inserted, 2);
    assert_eq!(report.replaced, 0);
    assert_eq!(report.dropped.len(), 1);
    assert_eq!(report.imported.len(), 2);

    let upper = f.archive.get(&key("2024-01-15", "upper1")).unwrap().unwrap();
    assert_eq!(upper.set_count(), 2);
    assert_eq!(
        upper.source,
        WorkoutSource::Imported {
            origin: "gym-sheet".into()
        }
    );
    assert!(f.archive.contains(&key("2024-01-17", "lower1")).unwrap());
}

#[tokio::test]
async fn manual_workout_is_never_overwritten() {
    let f = fixture(MockRemote::new(history()));
    let manual = manual_workout("2024-01-15");
    f.archive.put(&manual).unwrap();
    let raw_key = RecordKey::workout(&manual.key());
    let before = f.store.get(&raw_key).unwrap();

    let report = f.importer.import().await.unwrap();

    assert_eq!(report.skipped_manual, 1);
    assert_eq!(report.inserted, 1);
    assert_eq!(f.store.get(&raw_key).unwrap(), before);
    assert!(report.imported.iter().all(|w| w.key() != manual.key()));
}

#[tokio::test]
async fn merge_waits_for_the_shared_lock() {
    let f = fixture(MockRemote::new(history()));
    let lock = Arc::new(tokio::sync::Mutex::new(()));
    let importer = f.importer.with_lock(lock.clone());

    // A completion holds the lock and writes its manual workout.
    let guard = lock.lock().await;
    let import = tokio::spawn(async move { importer.import().await });
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    assert!(!f.archive.contains(&key("2024-01-17", "lower1")).unwrap());
    let manual = manual_workout("2024-01-15");
    f.archive.put(&manual).unwrap();
    drop(guard);

    let report = import.await.unwrap().unwrap();
    assert_eq!(report.skipped_manual, 1);
    assert_eq!(report.inserted, 1);
    let stored = f.archive.get(&manual.key()).unwrap().unwrap();
    assert_eq!((stored.id, stored.source), (manual.id, WorkoutSource::Manual));
}

#[tokio::test]
async fn reimport_is_unchanged_then_replaced_in_place() {
    let f = fixture(MockRemote::new(history()));
    f.importer.import().await.unwrap();
    let first = f.archive.get(&key("2024-01-15", "upper1")).unwrap().unwrap();

    let again = f.importer.import().await.unwrap();
    assert_eq!((again.inserted, again.replaced, again.unchanged), (0, 0, 2));
    assert!(again.imported.is_empty());

    let mut rows = history();
    rows.push(row("2024-01-15", "upper1", "Pec dec fly", "2", "135", "10"));
    let updater = Importer::new(
        Arc::new(MockRemote::new(rows)),
        f.archive.clone(),
        TemplateCatalog::builtin(),
        RetryPolicy::default(),
    );

    let updated = updater.import().await.unwrap();
    assert_eq!((updated.replaced, updated.unchanged), (1, 1));

    let replaced = f.archive.get(&key("2024-01-15", "upper1")).unwrap().unwrap();
    assert_eq!(replaced.id, first.id);
    assert_eq!(replaced.exercises[0].sets[1].weight, "135");
}

#[tokio::test]
async fn unreadable_record_is_left_alone() {
    let f = fixture(MockRemote::new(history()));
    let raw_key = RecordKey::workout(&key("2024-01-15", "upper1"));
    f.store.set(&raw_key, "{not json").unwrap();

    let report = f.importer.import().await.unwrap();

    assert_eq!(report.skipped_unreadable, 1);
    assert_eq!(report.inserted, 1);
    assert_eq!(f.store.get(&raw_key).unwrap().as_deref(), Some("{not json"));
}

// ── Remote failures ──────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn unavailable_remote_leaves_archive_untouched() {
    let f = fixture(MockRemote::new(history()).failing(u32::MAX));
    f.archive.put(&manual_workout("2024-01-10")).unwrap();

    let err = f.importer.import().await.unwrap_err();

    assert!(matches!(err, SyncError::RemoteUnavailable { attempts: 3, .. }));
    assert_eq!(f.remote.calls(), 3);
    assert_eq!(f.archive.list().unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn transient_failure_is_retried() {
    let f = fixture(MockRemote::new(history()).failing(1));

    let report = f.importer.import().await.unwrap();

    assert_eq!(report.inserted, 2);
    assert_eq!(f.remote.calls(), 2);
}

// ── Export ───────────────────────────────────────────────────────

#[tokio::test]
async fn push_workout_appends_complete_sets() {
    let f = fixture(MockRemote::new(Vec::new()));
    let mut workout = manual_workout("2024-02-01");
    workout.exercises[0].sets.push(Set::with_values("150", ""));
    workout.exercises[0].sets.push(Set::with_values("150", "6"));

    let written = f.importer.push_workout(&workout).await.unwrap();

    assert_eq!(written, 2);
    let rows = f.remote.rows();
    let numbers: Vec<&str> = rows.iter().map(|r| r.set_number.as_str()).collect();
    assert_eq!(numbers, vec!["1", "3"]);
    assert!(rows.iter().all(|r| r.status.as_deref() == Some("completed")));
}

#[tokio::test]
async fn push_to_rejecting_remote_fails_once() {
    let f = fixture(MockRemote::new(Vec::new()).rejecting());

    let err = f.importer.push_workout(&manual_workout("2024-02-01")).await.unwrap_err();

    assert!(matches!(err, SyncError::RemoteRejected(_)));
    assert_eq!(f.remote.calls(), 1);
}
