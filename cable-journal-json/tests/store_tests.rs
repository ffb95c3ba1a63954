use cable_journal_core::{
    invoke, BackupOutcome, Channel, CoreError, ExportOutcome, FileDialogs, Gateway,
    ImportOutcome, OpenDialog, SaveDialog, SaveOutcome,
};
use cable_journal_json::JsonStore;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::tempdir;

/// Answers every dialog with a fixed path (or cancels) and remembers the requests.
#[derive(Default)]
struct Scripted {
    answer: Option<PathBuf>,
    saves: Mutex<Vec<SaveDialog>>,
}

impl Scripted {
    fn answering(path: PathBuf) -> Arc<Self> {
        Arc::new(Self { answer: Some(path), ..Self::default() })
    }
}

impl FileDialogs for Scripted {
    fn save_file(&self, request: &SaveDialog) -> Result<Option<PathBuf>, CoreError> {
        self.saves.lock().unwrap().push(request.clone());
        Ok(self.answer.clone())
    }
    fn open_file(&self, _: &OpenDialog) -> Result<Option<PathBuf>, CoreError> {
        Ok(self.answer.clone())
    }
}

fn store_in(dir: &Path, dialogs: Arc<dyn FileDialogs>) -> JsonStore {
    JsonStore::open(dir.join("cable_journal_data.json"), dialogs)
}

fn backup_files(dir: &Path) -> Vec<PathBuf> {
    let mut v: Vec<PathBuf> = fs::read_dir(dir).unwrap().map(|e| e.unwrap().path()).collect();
    v.sort();
    v
}

#[tokio::test]
async fn save_then_load_round_trips() {
    let tmp = tempdir().unwrap();
    let store = store_in(tmp.path(), Arc::new(Scripted::default()));
    let entries = vec![json!({"id": 1, "cable": "A1"})];

    assert_eq!(store.save_data(&entries).await, SaveOutcome::Saved);
    assert_eq!(store.load_data().await, vec![json!({"id": 1, "cable": "A1"})]);
}

#[tokio::test]
async fn round_trip_keeps_entry_and_key_order() {
    let tmp = tempdir().unwrap();
    let store = store_in(tmp.path(), Arc::new(Scripted::default()));
    let entries = vec![
        json!({"zone": "B", "id": 2}),
        json!("free text"),
        json!({"id": 1, "meta": {"y": 1, "x": [3, 2, 1]}}),
    ];

    store.save_data(&entries).await;
    let loaded = store.load_data().await;
    assert_eq!(loaded, entries);
    let keys: Vec<&String> = loaded[0].as_object().unwrap().keys().collect();
    assert_eq!(keys, ["zone", "id"]);
}

#[tokio::test]
async fn data_file_is_two_space_pretty_json() {
    let tmp = tempdir().unwrap();
    let store = store_in(tmp.path(), Arc::new(Scripted::default()));
    store.save_data(&[json!({"id": 1, "cable": "A1"})]).await;

    let text = fs::read_to_string(store.data_path()).unwrap();
    assert_eq!(text, "[\n  {\n    \"id\": 1,\n    \"cable\": \"A1\"\n  }\n]");
}

#[tokio::test]
async fn load_without_file_is_empty() {
    let tmp = tempdir().unwrap();
    let store = store_in(tmp.path(), Arc::new(Scripted::default()));

    assert!(store.load_data().await.is_empty());
    assert!(store.read_entries().await.unwrap().is_none());
    assert!(!store.data_path().exists());
}

#[tokio::test]
async fn second_save_replaces_first() {
    let tmp = tempdir().unwrap();
    let store = store_in(tmp.path(), Arc::new(Scripted::default()));

    store.save_data(&[json!({"id": 1}), json!({"id": 2})]).await;
    store.save_data(&[json!({"id": 3})]).await;
    assert_eq!(store.load_data().await, vec![json!({"id": 3})]);
}

#[tokio::test]
async fn corrupt_file_loads_empty_but_is_reported_by_read_entries() {
    let tmp = tempdir().unwrap();
    let store = store_in(tmp.path(), Arc::new(Scripted::default()));
    fs::write(store.data_path(), "[{\"id\": 1,").unwrap();

    assert!(store.load_data().await.is_empty());
    assert!(matches!(store.read_entries().await, Err(CoreError::Json(_))));
}

#[tokio::test]
async fn leading_bom_is_tolerated() {
    let tmp = tempdir().unwrap();
    let store = store_in(tmp.path(), Arc::new(Scripted::default()));
    fs::write(store.data_path(), "\u{feff}[{\"id\": 5}]").unwrap();

    assert_eq!(store.load_data().await, vec![json!({"id": 5})]);
}

#[tokio::test]
async fn save_into_unwritable_location_reports_error() {
    let tmp = tempdir().unwrap();
    // A plain file where the parent directory should be.
    let blocker = tmp.path().join("blocker");
    fs::write(&blocker, "x").unwrap();
    let store = JsonStore::open(blocker.join("cable_journal_data.json"), Arc::new(Scripted::default()));

    match store.save_data(&[json!({"id": 1})]).await {
        SaveOutcome::Failed(msg) => assert!(!msg.is_empty()),
        other => panic!("expected failure, got {other:?}"),
    }
}

#[tokio::test]
async fn two_backups_get_distinct_names_and_same_content() {
    let tmp = tempdir().unwrap();
    let store = store_in(tmp.path(), Arc::new(Scripted::default()));
    let entries = vec![json!({"id": 1, "cable": "A1"})];
    store.save_data(&[json!({"id": 99})]).await;
    let before = fs::read(store.data_path()).unwrap();

    let first = store.backup_data(&entries).await;
    let second = store.backup_data(&entries).await;
    let (BackupOutcome::Written(a), BackupOutcome::Written(b)) = (first, second) else {
        panic!("backups should succeed");
    };

    assert_ne!(a, b);
    assert_eq!(a.parent().unwrap(), tmp.path().join("backups"));
    assert_eq!(fs::read_to_string(&a).unwrap(), fs::read_to_string(&b).unwrap());
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(&fs::read_to_string(&a).unwrap()).unwrap(),
        json!([{"id": 1, "cable": "A1"}])
    );
    assert_eq!(fs::read(store.data_path()).unwrap(), before);
    assert_eq!(backup_files(store.backups_dir()).len(), 2);
}

#[tokio::test]
async fn backup_names_follow_timestamp_pattern() {
    let tmp = tempdir().unwrap();
    let store = store_in(tmp.path(), Arc::new(Scripted::default()));
    let BackupOutcome::Written(path) = store.backup_data(&[]).await else {
        panic!("backup should succeed");
    };
    let name = path.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("backup_") && name.ends_with("Z.json"), "{name}");
    assert!(!name.contains(':'));
    assert_eq!(name.matches('.').count(), 1);
}

#[tokio::test]
async fn retention_prunes_oldest_backups() {
    let tmp = tempdir().unwrap();
    let file = tmp.path().join("cable_journal_data.json");
    let backups = tmp.path().join("backups");
    let store = JsonStore::open_with(file, backups.clone(), Some(2), Arc::new(Scripted::default()));

    let mut written = Vec::new();
    for i in 0..4 {
        if let BackupOutcome::Written(p) = store.backup_data(&[json!({"n": i})]).await {
            written.push(p);
        }
    }
    assert_eq!(backup_files(&backups), written[2..].to_vec());
}

#[tokio::test]
async fn export_writes_chosen_file_and_leaves_data_alone() {
    let tmp = tempdir().unwrap();
    let target = tmp.path().join("out").join("export.json");
    let dialogs = Scripted::answering(target.clone());
    let store = store_in(tmp.path(), dialogs.clone());
    store.save_data(&[json!({"id": 1})]).await;
    let before = fs::read(store.data_path()).unwrap();

    let out = store.export_data(&[json!({"id": 2})]).await;
    assert_eq!(out, ExportOutcome::Written(target.clone()));
    assert_eq!(fs::read_to_string(&target).unwrap(), "[\n  {\n    \"id\": 2\n  }\n]");
    assert_eq!(fs::read(store.data_path()).unwrap(), before);

    let asked = dialogs.saves.lock().unwrap();
    assert_eq!(asked[0].title, "Export data");
    assert!(asked[0].default_name.starts_with("cable_journal_"));
    assert_eq!(asked[0].filters[0].extensions, vec!["json".to_string()]);
}

#[tokio::test]
async fn canceled_dialogs_report_cancel() {
    let tmp = tempdir().unwrap();
    let store = store_in(tmp.path(), Arc::new(Scripted::default()));

    assert_eq!(store.export_data(&[json!(1)]).await, ExportOutcome::Canceled);
    assert_eq!(store.import_data().await, ImportOutcome::Canceled);
}

#[tokio::test]
async fn import_reads_file_without_touching_data_file() {
    let tmp = tempdir().unwrap();
    let source = tmp.path().join("incoming.json");
    fs::write(&source, "[{\"id\": 4, \"cable\": \"C3\"}]").unwrap();
    let store = store_in(tmp.path(), Scripted::answering(source));

    assert_eq!(
        store.import_data().await,
        ImportOutcome::Loaded(vec![json!({"id": 4, "cable": "C3"})])
    );
    assert!(!store.data_path().exists());
}

#[tokio::test]
async fn import_of_bad_json_is_a_failure_not_a_panic() {
    let tmp = tempdir().unwrap();
    let source = tmp.path().join("broken.json");
    fs::write(&source, "not json").unwrap();
    let store = store_in(tmp.path(), Scripted::answering(source));

    assert!(matches!(store.import_data().await, ImportOutcome::Failed(_)));
}

#[tokio::test]
async fn channels_drive_the_store() {
    let tmp = tempdir().unwrap();
    let store = store_in(tmp.path(), Arc::new(Scripted::default()));

    assert_eq!(invoke(&store, Channel::LoadData, None).await.unwrap(), json!([]));
    let saved = invoke(&store, Channel::SaveData, Some(json!([{"id": 1, "cable": "A1"}])))
        .await
        .unwrap();
    assert_eq!(saved, json!({"success": true}));
    assert_eq!(
        invoke(&store, Channel::LoadData, None).await.unwrap(),
        json!([{"id": 1, "cable": "A1"}])
    );
    assert_eq!(
        invoke(&store, Channel::GetDataPath, None).await.unwrap(),
        json!(store.data_path().to_string_lossy())
    );
}

#[cfg(unix)]
#[tokio::test]
async fn save_through_symlink_updates_link_target() {
    use std::os::unix::fs::symlink;

    let tmp = tempdir().unwrap();
    let synced = tmp.path().join("synced");
    fs::create_dir(&synced).unwrap();
    let real = synced.join("real.json");
    fs::write(&real, "[]").unwrap();
    let link = tmp.path().join("cable_journal_data.json");
    symlink(&real, &link).unwrap();
    let store = JsonStore::open(link.clone(), Arc::new(Scripted::default()));

    assert_eq!(store.save_data(&[json!({"id": 1, "cable": "A1"})]).await, SaveOutcome::Saved);

    assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
    assert_eq!(
        fs::read_to_string(&real).unwrap(),
        "[\n  {\n    \"id\": 1,\n    \"cable\": \"A1\"\n  }\n]"
    );
    assert_eq!(store.load_data().await, vec![json!({"id": 1, "cable": "A1"})]);
}

#[cfg(unix)]
#[tokio::test]
async fn written_files_get_readable_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = tempdir().unwrap();
    let target = tmp.path().join("shared.json");
    fs::write(&target, "old").unwrap();
    fs::set_permissions(&target, fs::Permissions::from_mode(0o640)).unwrap();
    let store = store_in(tmp.path(), Scripted::answering(target.clone()));

    store.save_data(&[json!({"id": 1})]).await;
    let mode = fs::metadata(store.data_path()).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o644);

    let BackupOutcome::Written(backup) = store.backup_data(&[]).await else {
        panic!("backup should succeed");
    };
    assert_eq!(fs::metadata(&backup).unwrap().permissions().mode() & 0o777, 0o644);

    // Overwriting an existing export keeps that file's mode.
    assert_eq!(store.export_data(&[]).await, ExportOutcome::Written(target.clone()));
    assert_eq!(fs::metadata(&target).unwrap().permissions().mode() & 0o777, 0o640);
    assert_eq!(fs::read_to_string(&target).unwrap(), "[]");
}

#[tokio::test]
async fn failed_pruning_keeps_the_new_backup() {
    let tmp = tempdir().unwrap();
    let file = tmp.path().join("cable_journal_data.json");
    let backups = tmp.path().join("backups");
    // Looks like the oldest backup but is a non-empty folder, so it cannot be removed.
    let stuck = backups.join("backup_0000.json");
    fs::create_dir_all(&stuck).unwrap();
    fs::write(stuck.join("keep"), "x").unwrap();
    let store = JsonStore::open_with(file, backups, Some(1), Arc::new(Scripted::default()));

    let BackupOutcome::Written(path) = store.backup_data(&[json!({"id": 1})]).await else {
        panic!("backup should still be reported as written");
    };
    assert!(path.is_file());
    assert!(stuck.is_dir());
}
