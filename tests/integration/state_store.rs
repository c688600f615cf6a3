use serde_json::json;
use tempfile::TempDir;
use uploadtracker::store::{DocumentStore, SledDocumentStore};
use uploadtracker::types::LAST_FOLDER_ID;

#[test]
fn sentinel_upsert_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let store = SledDocumentStore::open(&dir.path().join("db")).unwrap();
    let patch = json!({"path": "/docs", "type": "info"});

    let first = store.upsert(LAST_FOLDER_ID, &patch).unwrap();
    let second = store.upsert(LAST_FOLDER_ID, &patch).unwrap();

    assert_eq!(first, second);
    assert_eq!(first["id"], LAST_FOLDER_ID);
    assert_eq!(store.ids().unwrap(), vec![LAST_FOLDER_ID.to_string()]);
}

#[test]
fn upsert_merges_top_level_fields() {
    let dir = TempDir::new().unwrap();
    let store = SledDocumentStore::open(&dir.path().join("db")).unwrap();

    store
        .upsert(LAST_FOLDER_ID, &json!({"path": "/docs", "files": [1, 2]}))
        .unwrap();
    let merged = store
        .upsert(LAST_FOLDER_ID, &json!({"path": "/other"}))
        .unwrap();

    assert_eq!(merged["path"], "/other");
    assert_eq!(merged["files"], json!([1, 2]));
    assert!(merged.get("createdAt").is_some());
    assert!(merged.get("updatedAt").is_some());
}

#[test]
fn update_without_match_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let store = SledDocumentStore::open(&dir.path().join("db")).unwrap();

    assert!(!store.update(LAST_FOLDER_ID, &json!({"files": []})).unwrap());
    assert!(store.find_one(LAST_FOLDER_ID).unwrap().is_none());
    assert!(store.ids().unwrap().is_empty());
}

#[test]
fn last_write_wins() {
    let dir = TempDir::new().unwrap();
    let store = SledDocumentStore::open(&dir.path().join("db")).unwrap();
    store.upsert("doc", &json!({"status": "Converting"})).unwrap();

    assert!(store.update("doc", &json!({"status": "Failed"})).unwrap());
    assert!(store.update("doc", &json!({"status": "Converted"})).unwrap());

    assert_eq!(store.find_one("doc").unwrap().unwrap()["status"], "Converted");
}

#[test]
fn records_survive_reopening_the_store() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("db");
    {
        let store = SledDocumentStore::open(&path).unwrap();
        store
            .upsert(LAST_FOLDER_ID, &json!({"path": "/docs"}))
            .unwrap();
        store.flush().unwrap();
    }

    let reopened = SledDocumentStore::open(&path).unwrap();
    assert_eq!(
        reopened.find_one(LAST_FOLDER_ID).unwrap().unwrap()["path"],
        "/docs"
    );
}
