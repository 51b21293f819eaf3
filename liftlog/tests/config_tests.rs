use liftlog::{ConfigError, LiftlogConfig};
use pretty_assertions::assert_eq;
use std::path::PathBuf;
use std::time::Duration;

fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("liftlog.toml");
    std::fs::write(&path, contents).unwrap();
    (dir, path)
}

#[test]
fn missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = LiftlogConfig::load_from(dir.path().join("absent.toml")).unwrap();

    assert_eq!(config, LiftlogConfig::default());
    assert_eq!(config.session.debounce_ms, 200);
    assert_eq!(config.remote.max_attempts, 3);
    assert_eq!(config.store.path, None);
    assert_eq!(config.catalog().len(), 4);
}

#[test]
fn full_file_is_applied() {
    let (_dir, path) = write_config(
        r#"
        [session]
        debounce_ms = 120
        persist_retries = 2

        [remote]
        max_attempts = 5
        base_delay_ms = 250
        max_delay_ms = 1000

        [store]
        path = "/var/lib/liftlog/records.db"

        [[templates]]
        key = "push"
        name = "Push Day"
        exercises = ["Bench Press", "Overhead Press"]
        "#,
    );

    let config = LiftlogConfig::load_from(&path).unwrap();

    let session = config.session_config();
    assert_eq!(session.debounce, Duration::from_millis(120));
    assert_eq!(session.persist_retries, 2);

    let retry = config.retry_policy();
    assert_eq!(retry.max_attempts, 5);
    assert_eq!(retry.delay_for(3), Duration::from_millis(1000));

    assert_eq!(config.store.path, Some(PathBuf::from("/var/lib/liftlog/records.db")));

    let catalog = config.catalog();
    assert_eq!(catalog.len(), 1);
    let push = catalog.resolve_label("Push Day").unwrap();
    assert_eq!(push.exercises, vec!["Bench Press", "Overhead Press"]);
}

#[test]
fn debounce_is_clamped() {
    let config = LiftlogConfig::from_toml_str("[session]\ndebounce_ms = 5000\n").unwrap();
    assert_eq!(config.session_config().debounce, Duration::from_millis(300));
}

#[test]
fn partial_sections_keep_other_defaults() {
    let config = LiftlogConfig::from_toml_str("[remote]\nmax_attempts = 4\n").unwrap();
    assert_eq!(config.remote.max_attempts, 4);
    assert_eq!(config.remote.base_delay_ms, 500);
    assert_eq!(config.session.persist_retries, 1);
}

#[test]
fn invalid_values_are_rejected() {
    let zero = LiftlogConfig::from_toml_str("[remote]\nmax_attempts = 0\n");
    assert!(matches!(zero, Err(ConfigError::Invalid(_))));

    let duplicate = LiftlogConfig::from_toml_str(
        r#"
        [[templates]]
        key = "a"
        name = "A"
        exercises = ["Squat"]

        [[templates]]
        key = "a"
        name = "A again"
        exercises = ["Deadlift"]
        "#,
    );
    assert!(matches!(duplicate, Err(ConfigError::Invalid(_))));

    let empty = LiftlogConfig::from_toml_str(
        "[[templates]]\nkey = \"a\"\nname = \"A\"\nexercises = []\n",
    );
    assert!(matches!(empty, Err(ConfigError::Invalid(_))));
}

#[test]
fn malformed_file_is_an_error_or_falls_back() {
    let (_dir, path) = write_config("[session\ndebounce_ms = ");

    assert!(matches!(LiftlogConfig::load_from(&path), Err(ConfigError::Parse(_))));
    assert_eq!(LiftlogConfig::load_or_default(&path), LiftlogConfig::default());
}
