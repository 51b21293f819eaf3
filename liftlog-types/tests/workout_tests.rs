use liftlog_types::{
    ExerciseLog, Session, Set, Template, Timestamp, Workout, WorkoutDate, WorkoutSource,
};
use pretty_assertions::assert_eq;

fn upper1() -> Template {
    Template::new("upper1", "Upper 1", ["Bench Press", "Row"])
}

fn date() -> WorkoutDate {
    WorkoutDate::from_ymd(2024, 5, 1).unwrap()
}

// ── Session ──────────────────────────────────────────────────────

#[test]
fn start_creates_one_empty_row_per_exercise() {
    let session = Session::start(&upper1(), date());
    assert_eq!(session.exercises.len(), 2);
    assert!(session.exercises.iter().all(|e| e.sets.len() == 1));
    assert!(!session.has_valid_sets());
    assert_eq!(session.key().to_string(), "2024-05-01-upper1");
}

#[test]
fn align_with_adds_new_template_exercises_and_keeps_ad_hoc() {
    let mut session = Session::start(&upper1(), date());
    session.exercises[1].sets[0] = Set::with_values("135", "10");

    let changed = Template::new("upper1", "Upper 1", ["Bench Press", "Curl"]);
    let added = session.align_with(&changed);

    assert_eq!(added, vec!["Curl".to_string()]);
    let names: Vec<&str> = session.exercises.iter().map(|e| e.exercise.as_str()).collect();
    assert_eq!(names, vec!["Bench Press", "Row", "Curl"]);
    let ad_hoc: Vec<&str> = session.ad_hoc_exercises(&changed).collect();
    assert_eq!(ad_hoc, vec!["Row"]);
    assert_eq!(session.exercise("Row").unwrap().sets[0].weight, "135");
}

#[test]
fn align_with_restores_missing_set_row() {
    let mut session = Session::start(&upper1(), date());
    session.exercises[0].sets.clear();
    session.align_with(&upper1());
    assert_eq!(session.exercises[0].sets.len(), 1);
}

// ── Workout ──────────────────────────────────────────────────────

#[test]
fn workout_keeps_only_complete_sets() {
    let mut session = Session::start(&upper1(), date());
    session.exercises[0].sets = vec![Set::with_values("185", "8"), Set::with_values("185", "")];

    let workout = Workout::from_session(&session, "Upper 1", Timestamp::now()).unwrap();

    assert_eq!(
        workout.exercises,
        vec![ExerciseLog::with_sets("Bench Press", vec![Set::with_values("185", "8")])]
    );
    assert!(workout.exercise("Row").is_none());
    assert_eq!(workout.source, WorkoutSource::Manual);
    assert_eq!(workout.session_id, Some(session.id));
    assert_eq!(workout.set_count(), 1);
    assert_eq!(workout.volume(), 1480.0);
}

#[test]
fn workout_requires_a_complete_set() {
    let session = Session::start(&upper1(), date());
    assert!(Workout::from_session(&session, "Upper 1", Timestamp::now()).is_none());
}

#[test]
fn workout_json_roundtrip() {
    let mut session = Session::start(&upper1(), date());
    session.exercises[0].sets[0] = Set::with_values("185", "8");
    let mut workout = Workout::from_session(&session, "Upper 1", Timestamp::now()).unwrap();
    workout.source = WorkoutSource::Imported {
        origin: "sheets".into(),
    };

    let json = serde_json::to_string(&workout).unwrap();
    assert!(json.contains(r#""kind":"imported""#));
    let parsed: Workout = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, workout);
}
