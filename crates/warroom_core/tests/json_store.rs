use serde_json::json;
use std::fs;
use warroom_core::{
    Document, DocumentStore, JsonFileStore, Mission, Settings, StateManager, StorageConfig, Task,
};

fn store_in(dir: &tempfile::TempDir) -> JsonFileStore {
    JsonFileStore::new(StorageConfig::in_dir(dir.path()))
}

#[test]
fn load_creates_default_document_when_file_is_missing() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(StorageConfig::in_dir(dir.path().join("nested")));

    let document = store.load().unwrap();
    assert!(document.tasks.is_empty());
    assert!(document.missions.is_empty());
    assert_eq!(document.settings, Settings::default());
    assert!(store.data_file().exists());

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(store.data_file()).unwrap()).unwrap();
    assert_eq!(
        written,
        json!({
            "tasks": [],
            "missions": [],
            "settings": {
                "showCompletedTasks": true,
                "showCompletedMissions": true,
                "theme": "dark"
            }
        })
    );
}

#[test]
fn corrupt_file_is_replaced_with_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    fs::write(store.data_file(), "{ not json").unwrap();

    let document = store.load().unwrap();
    assert_eq!(document, Document::default());

    let rewritten = fs::read_to_string(store.data_file()).unwrap();
    let reparsed: Document = serde_json::from_str(&rewritten).unwrap();
    assert_eq!(reparsed, Document::default());
}

#[test]
fn save_then_load_roundtrips() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);

    let mission = Mission::new("Alpha");
    let mut task = Task::new("T1");
    task.mission_id = Some(mission.id.clone());
    task.is_done = true;
    let mut document = Document {
        tasks: vec![task, Task::new("standalone")],
        missions: vec![mission],
        ..Document::default()
    };
    document
        .settings
        .set_extra_value("sidebarWidth", json!(320));

    store.save(&document).unwrap();
    assert_eq!(store.load().unwrap(), document);

    let raw = fs::read_to_string(store.data_file()).unwrap();
    assert!(raw.contains("\n  \"tasks\""), "expected two-space indent");
}

#[test]
fn wire_format_uses_camel_case_and_defaults_optional_fields() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    fs::write(
        store.data_file(),
        json!({
            "tasks": [
                { "id": "11111111-2222-4333-8444-555555555555", "title": "minimal" },
                {
                    "id": "22222222-2222-4333-8444-555555555555",
                    "title": "full",
                    "isDone": true,
                    "missionId": "33333333-2222-4333-8444-555555555555",
                    "createdAt": 1_700_000_000_000_i64,
                    "updatedAt": 1_700_000_100_000_i64
                }
            ],
            "missions": [
                { "id": "33333333-2222-4333-8444-555555555555", "title": "Alpha", "isManuallyCompleted": true }
            ]
        })
        .to_string(),
    )
    .unwrap();

    let document = store.load().unwrap();
    let minimal = &document.tasks[0];
    assert!(!minimal.is_done);
    assert_eq!(minimal.mission_id, None);
    assert_eq!(minimal.created_at, 0);

    let full = &document.tasks[1];
    assert!(full.is_done);
    assert_eq!(full.mission_id, Some(document.missions[0].id.clone()));
    assert_eq!(full.updated_at, 1_700_000_100_000);
    assert!(document.missions[0].is_manually_completed);
    assert_eq!(document.settings, Settings::default());

    let value = serde_json::to_value(&document.tasks[1]).unwrap();
    assert_eq!(value["isDone"], json!(true));
    assert_eq!(value["missionId"], json!("33333333-2222-4333-8444-555555555555"));
}

#[test]
fn non_uuid_ids_load_unchanged_and_are_not_reset() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    let seeded = json!({
        "tasks": [
            { "id": "t1", "title": "keep me", "missionId": "m1", "isDone": true, "priority": 3 },
            { "id": "42", "title": "numeric-looking id" }
        ],
        "missions": [{ "id": "m1", "title": "Legacy", "isManuallyCompleted": true }],
        "settings": { "theme": "light" }
    });
    fs::write(store.data_file(), seeded.to_string()).unwrap();

    let document = store.load().unwrap();
    assert_eq!(document.tasks.len(), 2);
    assert_eq!(document.tasks[0].id.as_str(), "t1");
    assert_eq!(document.tasks[0].mission_id, Some("m1".into()));
    assert_eq!(document.tasks[1].id.as_str(), "42");
    assert_eq!(document.missions[0].id.as_str(), "m1");
    assert_eq!(document.settings.theme, "light");

    let on_disk: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(store.data_file()).unwrap()).unwrap();
    assert_eq!(on_disk, seeded);

    let mut manager = StateManager::open(store.clone()).unwrap();
    manager.toggle_task(&"42".into()).unwrap().unwrap();
    let rewritten: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(store.data_file()).unwrap()).unwrap();
    assert_eq!(rewritten["tasks"][0]["id"], json!("t1"));
    assert_eq!(rewritten["tasks"][0]["priority"], json!(3));
    assert_eq!(rewritten["tasks"][1]["isDone"], json!(true));
    assert_eq!(rewritten["missions"][0]["id"], json!("m1"));
}

#[test]
fn document_missing_id_is_treated_as_corrupt() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    fs::write(
        store.data_file(),
        json!({ "missions": [{ "title": "no id" }] }).to_string(),
    )
    .unwrap();

    assert_eq!(store.load().unwrap(), Document::default());
}

#[test]
fn document_missing_title_is_treated_as_corrupt() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    fs::write(
        store.data_file(),
        json!({ "tasks": [{ "id": "11111111-2222-4333-8444-555555555555" }] }).to_string(),
    )
    .unwrap();

    assert_eq!(store.load().unwrap(), Document::default());
}

#[test]
fn backup_copies_current_file_into_backups_dir() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    let mut manager = StateManager::open(store.clone()).unwrap();
    manager.add_task("keep me").unwrap();

    let report = store.backup();
    assert!(report.success, "{report:?}");
    let file = report.file.expect("backup should name its file");
    assert!(file.starts_with(&store.config().backups_dir));
    assert_eq!(
        fs::read_to_string(&file).unwrap(),
        fs::read_to_string(store.data_file()).unwrap()
    );

    let encoded = serde_json::to_value(store.backup()).unwrap();
    assert_eq!(encoded["success"], json!(true));
    assert!(encoded.get("error").is_none());
}

#[test]
fn backup_failure_is_reported_not_raised() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);

    let report = store.backup();
    assert!(!report.success);
    assert!(report.file.is_none());
    assert!(report.error.unwrap().contains("copy"));
}

#[test]
fn state_survives_a_new_session() {
    let dir = tempfile::tempdir().unwrap();
    let mut first = StateManager::open(store_in(&dir)).unwrap();
    let mission = first.add_mission("Alpha").unwrap();
    let task = first.add_task("T1").unwrap();
    first
        .assign_task_to_mission(&task.id, Some(mission.id.clone()))
        .unwrap();
    let expected = first.document().clone();
    drop(first);

    let second = StateManager::open(store_in(&dir)).unwrap();
    assert_eq!(second.document(), &expected);
}
