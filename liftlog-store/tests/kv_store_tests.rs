use liftlog_store::{KvStore, MemoryStore, SqliteStore};
use pretty_assertions::assert_eq;

fn exercise_contract(store: &dyn KvStore) {
    assert_eq!(store.get("session-2024-05-01-upper1").unwrap(), None);

    store.set("session-2024-05-01-upper1", "{\"a\":1}").unwrap();
    store.set("session-2024-05-02-lower1", "{}").unwrap();
    store.set("workout-complete-2024-05-01-upper1", "{}").unwrap();

    assert_eq!(
        store.get("session-2024-05-01-upper1").unwrap().as_deref(),
        Some("{\"a\":1}")
    );
    assert!(store.contains("session-2024-05-02-lower1").unwrap());

    store.set("session-2024-05-01-upper1", "{\"a\":2}").unwrap();
    assert_eq!(
        store.get("session-2024-05-01-upper1").unwrap().as_deref(),
        Some("{\"a\":2}")
    );

    assert_eq!(
        store.list_keys_with_prefix("session-").unwrap(),
        vec![
            "session-2024-05-01-upper1".to_string(),
            "session-2024-05-02-lower1".to_string(),
        ]
    );
    assert_eq!(store.list_keys_with_prefix("workout-complete-").unwrap().len(), 1);
    assert!(store.list_keys_with_prefix("nothing-").unwrap().is_empty());

    assert!(store.delete("session-2024-05-01-upper1").unwrap());
    assert!(!store.delete("session-2024-05-01-upper1").unwrap());
    assert_eq!(store.get("session-2024-05-01-upper1").unwrap(), None);
}

// ── MemoryStore ──────────────────────────────────────────────────

#[test]
fn memory_store_satisfies_contract() {
    let store = MemoryStore::new();
    exercise_contract(&store);
    assert_eq!(store.len(), 2);
}

#[test]
fn memory_store_starts_empty() {
    assert!(MemoryStore::new().is_empty());
}

// ── SqliteStore ──────────────────────────────────────────────────

#[test]
fn sqlite_in_memory_satisfies_contract() {
    let store = SqliteStore::open_in_memory().unwrap();
    exercise_contract(&store);
}

#[test]
fn sqlite_prefix_is_literal() {
    let store = SqliteStore::open_in_memory().unwrap();
    store.set("session-x", "1").unwrap();
    store.set("sessionXy", "2").unwrap();
    store.set("session_%", "3").unwrap();
    assert_eq!(
        store.list_keys_with_prefix("session-").unwrap(),
        vec!["session-x".to_string()]
    );
    assert_eq!(
        store.list_keys_with_prefix("session_%").unwrap(),
        vec!["session_%".to_string()]
    );
}

#[test]
fn sqlite_file_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("liftlog.db");

    {
        let store = SqliteStore::open(&path).unwrap();
        store.set("workout-complete-2024-05-01-upper1", "{}").unwrap();
    }

    let reopened = SqliteStore::open(&path).unwrap();
    assert!(reopened.contains("workout-complete-2024-05-01-upper1").unwrap());
}
