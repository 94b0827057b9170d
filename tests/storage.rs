use perfreport::errors::PerfError;
use perfreport::storage::{report_blob_name, LocalStorage, ReportStorage, SqliteStorage};

#[tokio::test]
async fn test_local_put_then_get() {
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalStorage::new(dir.path().join("reports"));
    let name = report_blob_name("guid-1");

    storage.put(&name, "{\"tasks\":[]}").await.unwrap();

    assert_eq!(storage.get(&name).await.unwrap().as_deref(), Some("{\"tasks\":[]}"));
    assert!(dir.path().join("reports/report_guid-1.json").exists());
}

#[tokio::test]
async fn test_local_overwrite_leaves_no_temp_file() {
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalStorage::new(dir.path());

    storage.put("report_a.json", "first").await.unwrap();
    storage.put("report_a.json", "second").await.unwrap();

    assert_eq!(storage.get("report_a.json").await.unwrap().as_deref(), Some("second"));
    let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[tokio::test]
async fn test_local_missing_is_none() {
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalStorage::new(dir.path());
    assert_eq!(storage.get("report_missing.json").await.unwrap(), None);
}

#[tokio::test]
async fn test_local_rejects_path_traversal() {
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalStorage::new(dir.path());
    let result = storage.put("../escape.json", "x").await;
    assert!(matches!(result, Err(PerfError::InvalidRequest(_))));
}

#[tokio::test]
async fn test_local_unwritable_directory_is_storage_error() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "file").unwrap();
    let storage = LocalStorage::new(&blocker);
    let result = storage.put("report_x.json", "{}").await;
    assert!(matches!(result, Err(PerfError::Storage(_))));
}

#[tokio::test]
async fn test_sqlite_upsert() {
    let storage = SqliteStorage::in_memory().unwrap();
    assert_eq!(storage.get("report_s.json").await.unwrap(), None);

    storage.put("report_s.json", "v1").await.unwrap();
    storage.put("report_s.json", "v2").await.unwrap();

    assert_eq!(storage.get("report_s.json").await.unwrap().as_deref(), Some("v2"));
}

#[tokio::test]
async fn test_sqlite_file_database_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data/reports.db");
    let path = path.to_str().unwrap();

    SqliteStorage::open(path).unwrap().put("report_p.json", "kept").await.unwrap();
    let reopened = SqliteStorage::open(path).unwrap();

    assert_eq!(reopened.get("report_p.json").await.unwrap().as_deref(), Some("kept"));
}
