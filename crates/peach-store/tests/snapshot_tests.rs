use peach_core::{InternalStatus, Role, TaskId};
use peach_store::api::*;
use peach_store::{DeskConfig, DeskHandle, Snapshot, SnapshotError, SNAPSHOT_VERSION};
use peach_test_utils::{handle_logged_in_as, task};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tempfile::TempDir;

#[test]
fn test_snapshot_file_round_trip() {
    let desk = handle_logged_in_as(Role::Writer);
    desk.start_writing(&TaskId::new("t1")).unwrap();
    desk.save_draft(&TaskId::new("t1"), "Gentle hygienist, zero wait.").unwrap();

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("desk.json");
    let snapshot = desk.export_snapshot();
    snapshot.save(&path).unwrap();

    let loaded = Snapshot::load(&path).unwrap();
    assert_eq!(loaded.version, SNAPSHOT_VERSION);
    assert_eq!(loaded, snapshot);
    assert_eq!(loaded.state.current_user.as_ref().unwrap().id, "w1");
}

#[test]
fn test_restored_desk_resets_to_the_snapshot() {
    let source = handle_logged_in_as(Role::Writer);
    source.start_writing(&TaskId::new("t1")).unwrap();
    let snapshot = source.export_snapshot();

    let desk = DeskHandle::from_snapshot(snapshot.clone(), DeskConfig::default());
    assert_eq!(*desk.snapshot(), snapshot.state);

    desk.mark_written(&TaskId::new("t1")).unwrap();
    desk.logout();
    assert_eq!(task(&desk.snapshot(), "t1").internal_status, InternalStatus::Written);

    desk.reset();
    let state = desk.snapshot();
    assert_eq!(*state, snapshot.state);
    assert_eq!(task(&state, "t1").internal_status, InternalStatus::Writing);
    assert_eq!(state.current_user.as_ref().unwrap().id, "w1");
}

#[test]
fn test_reset_is_published() {
    let desk = handle_logged_in_as(Role::Admin);
    let rx = desk.subscribe();

    desk.reset();
    assert!(rx.has_changed().unwrap());
    assert!(Arc::ptr_eq(&desk.snapshot(), &rx.borrow()));
    assert!(desk.current_user().is_none());
}

#[test]
fn test_load_missing_file_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let err = Snapshot::load(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, SnapshotError::Io { .. }));
}

#[test]
fn test_load_rejects_other_versions() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("old.json");

    let mut json: serde_json::Value =
        serde_json::from_str(&handle_logged_in_as(Role::Admin).export_snapshot().to_json().unwrap())
            .unwrap();
    json["version"] = serde_json::json!(SNAPSHOT_VERSION + 1);
    std::fs::write(&path, json.to_string()).unwrap();

    assert!(matches!(
        Snapshot::load(&path),
        Err(SnapshotError::UnsupportedVersion { found, .. }) if found == SNAPSHOT_VERSION + 1
    ));
}

#[test]
fn test_load_rejects_garbage() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("garbage.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(matches!(Snapshot::load(&path), Err(SnapshotError::Serde(_))));
}

#[test]
fn test_load_rejects_records_that_fail_validation() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad-user.json");

    let mut json: serde_json::Value =
        serde_json::from_str(&handle_logged_in_as(Role::Admin).export_snapshot().to_json().unwrap())
            .unwrap();
    json["users"][0]["email"] = serde_json::json!("not-an-email");
    std::fs::write(&path, json.to_string()).unwrap();

    assert!(matches!(Snapshot::load(&path), Err(SnapshotError::Invalid(_))));
}

#[test]
fn test_load_dedups_location_platforms() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("platforms.json");

    let mut json: serde_json::Value =
        serde_json::from_str(&handle_logged_in_as(Role::Admin).export_snapshot().to_json().unwrap())
            .unwrap();
    let platforms = json["locations"][0]["platforms"].clone();
    let doubled: Vec<serde_json::Value> = platforms
        .as_array()
        .unwrap()
        .iter()
        .chain(platforms.as_array().unwrap())
        .cloned()
        .collect();
    json["locations"][0]["platforms"] = serde_json::Value::Array(doubled);
    std::fs::write(&path, json.to_string()).unwrap();

    let loaded = Snapshot::load(&path).unwrap();
    let original = handle_logged_in_as(Role::Admin).snapshot();
    assert_eq!(loaded.state.locations[0].platforms, original.locations[0].platforms);
}
