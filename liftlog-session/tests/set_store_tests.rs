use liftlog_session::SetStore;
use liftlog_types::{Session, SetField, Template, Timestamp, WorkoutDate};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn grid() -> SetStore {
    let template = Template::new("upper1", "Upper 1", ["Bench Press", "Row"]);
    SetStore::new(Session::start(&template, WorkoutDate::from_ymd(2024, 5, 1).unwrap()))
}

#[test]
fn add_set_appends_and_returns_index() {
    let mut grid = grid();
    assert_eq!(grid.add_set("Bench Press"), 1);
    assert_eq!(grid.add_set("Bench Press"), 2);
    assert_eq!(grid.exercise_data()[0].sets.len(), 3);
}

#[test]
fn add_set_for_unknown_exercise_adds_ad_hoc_entry() {
    let mut grid = grid();
    assert_eq!(grid.add_set("Face Pull"), 0);
    let names: Vec<&str> = grid.exercise_data().iter().map(|e| e.exercise.as_str()).collect();
    assert_eq!(names, vec!["Bench Press", "Row", "Face Pull"]);
}

#[test]
fn remove_set_keeps_last_row() {
    let mut grid = grid();
    assert!(!grid.remove_set("Row", 0));
    assert_eq!(grid.exercise_data()[1].sets.len(), 1);
    assert!(!grid.remove_set("Missing", 0));
}

#[test]
fn remove_set_renumbers_following_sets() {
    let mut grid = grid();
    grid.add_set("Bench Press");
    grid.add_set("Bench Press");
    grid.update_set("Bench Press", 2, SetField::Weight, "200", Timestamp::now());

    assert!(grid.remove_set("Bench Press", 1));
    let sets = &grid.exercise_data()[0].sets;
    assert_eq!(sets.len(), 2);
    assert_eq!(sets[1].weight, "200");
}

#[test]
fn update_set_stamps_and_reports_completion() {
    let mut grid = grid();
    let at = Timestamp::from_millis(42);

    let first = grid.update_set("Bench Press", 0, SetField::Weight, "185", at).unwrap();
    assert!(!first.completed);
    assert!(first.set.saved);
    assert_eq!(first.set.saved_at, Some(at));
    assert!(!grid.has_valid_sets());

    let second = grid.update_set("Bench Press", 0, SetField::Reps, "8", at).unwrap();
    assert!(second.completed);
    assert_eq!(second.set_number, 1);
    assert!(grid.has_valid_sets());

    let notes = grid.update_set("Bench Press", 0, SetField::Notes, "easy", at).unwrap();
    assert!(!notes.completed);
}

#[test]
fn update_set_out_of_range_is_none() {
    let mut grid = grid();
    assert!(grid.update_set("Bench Press", 3, SetField::Weight, "1", Timestamp::now()).is_none());
    assert!(grid.update_set("Curl", 0, SetField::Weight, "1", Timestamp::now()).is_none());
}

#[test]
fn whitespace_only_fields_are_not_valid() {
    let mut grid = grid();
    grid.update_set("Row", 0, SetField::Weight, "  ", Timestamp::now());
    grid.update_set("Row", 0, SetField::Reps, "10", Timestamp::now());
    assert!(!grid.has_valid_sets());
}

#[derive(Debug, Clone)]
enum Op {
    Add(usize),
    Remove(usize, usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..2usize).prop_map(Op::Add),
        (0..2usize, 0..6usize).prop_map(|(e, i)| Op::Remove(e, i)),
    ]
}

proptest! {
    #[test]
    fn every_exercise_keeps_at_least_one_row(ops in prop::collection::vec(op(), 0..64)) {
        let names = ["Bench Press", "Row"];
        let mut grid = grid();
        for op in ops {
            match op {
                Op::Add(e) => {
                    grid.add_set(names[e]);
                }
                Op::Remove(e, i) => {
                    let before = grid.exercise_data()[e].sets.len();
                    let removed = grid.remove_set(names[e], i);
                    prop_assert_eq!(removed, before > 1 && i < before);
                }
            }
            prop_assert!(grid.exercise_data().iter().all(|log| !log.sets.is_empty()));
        }
    }
}
