// File: streamwatch-core/tests/state_store_tests.rs

use std::fs;
use tempfile::tempdir;

use streamwatch_common::models::{Platform, StatusKey, StatusMap};
use streamwatch_common::traits::StateStore;
use streamwatch_core::state::{parse_status_map, JsonStateStore};
use streamwatch_core::Error;

#[test]
fn test_missing_file_loads_empty() {
    let dir = tempdir().unwrap();
    let store = JsonStateStore::new(dir.path().join("stream_state.json"));

    assert!(store.load().is_empty());
}

#[test]
fn test_malformed_file_loads_empty() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("stream_state.json");
    fs::write(&path, "{\"Twitch_abc\": tru").unwrap();

    assert!(JsonStateStore::new(&path).load().is_empty());

    fs::write(&path, "[true, false]").unwrap();
    assert!(JsonStateStore::new(&path).load().is_empty(), "a top-level array is not a status map");
}

#[test]
fn test_non_boolean_entries_are_dropped() -> Result<(), Error> {
    let statuses = parse_status_map(br#"{"Twitch_abc": true, "Kick_x": "yes", "Kick_y": 1, "Kick_z": false}"#)?;

    assert_eq!(statuses.len(), 2);
    assert_eq!(statuses.get(&StatusKey::new(Platform::Twitch, "abc")), Some(true));
    assert_eq!(statuses.get(&StatusKey::new(Platform::Kick, "z")), Some(false));
    assert_eq!(statuses.get(&StatusKey::new(Platform::Kick, "x")), None);
    Ok(())
}

#[test]
fn test_save_writes_flat_object_with_exact_keys() -> Result<(), Error> {
    let dir = tempdir().unwrap();
    let path = dir.path().join("stream_state.json");
    let store = JsonStateStore::new(&path);

    let mut statuses = StatusMap::new();
    statuses.set(&StatusKey::new(Platform::Twitch, "naimi"), true);
    statuses.set(&StatusKey::new(Platform::Kick, "marouane53"), false);
    store.save(&statuses)?;

    let written: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
    assert_eq!(written, serde_json::json!({"Kick_marouane53": false, "Twitch_naimi": true}));
    assert_eq!(store.load(), statuses);
    Ok(())
}

#[test]
fn test_unchanged_map_rewrites_identical_bytes() -> Result<(), Error> {
    let dir = tempdir().unwrap();
    let path = dir.path().join("stream_state.json");
    fs::write(&path, r#"{"Twitch_b": false, "Kick_a": true, "Twitch_a": true}"#)?;
    let store = JsonStateStore::new(&path);

    store.save(&store.load())?;
    let first = fs::read(&path)?;
    store.save(&store.load())?;
    let second = fs::read(&path)?;

    assert_eq!(first, second);
    assert_eq!(String::from_utf8_lossy(&first), r#"{"Kick_a":true,"Twitch_a":true,"Twitch_b":false}"#);
    Ok(())
}

#[test]
fn test_save_replaces_previous_contents() -> Result<(), Error> {
    let dir = tempdir().unwrap();
    let path = dir.path().join("stream_state.json");
    let store = JsonStateStore::new(&path);

    let mut statuses = StatusMap::new();
    statuses.insert_raw("Twitch_old", true);
    store.save(&statuses)?;

    let replacement: StatusMap = vec![("Kick_new".to_string(), true)].into_iter().collect();
    store.save(&replacement)?;

    assert_eq!(store.load(), replacement);
    // Only the target remains; the temp file was renamed over it.
    let leftovers: Vec<_> = fs::read_dir(dir.path())?.collect();
    assert_eq!(leftovers.len(), 1);
    Ok(())
}

#[test]
fn test_save_into_missing_directory_fails() {
    let dir = tempdir().unwrap();
    let store = JsonStateStore::new(dir.path().join("no_such_dir").join("stream_state.json"));

    let result = store.save(&StatusMap::new());
    assert!(result.is_err());
}
