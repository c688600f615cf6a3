use std::fs;
use tempfile::TempDir;
use uploadtracker::app::{FolderPayload, Request, Response};
use uploadtracker::store::DocumentStore;
use uploadtracker::types::{FileStatus, TrackedFolder, LAST_FOLDER_ID};

use crate::integration::support::{at, set_mtime, test_app, write_files};

#[tokio::test]
async fn get_before_track_returns_empty_payload() {
    let store_dir = TempDir::new().unwrap();
    let t = test_app(store_dir.path());

    let response = t.app.handle(Request::GetTrackedFolder).await;
    assert_eq!(response, Some(Response::GotFolder(FolderPayload::default())));
    assert!(t.notifier.drain().is_empty());
}

#[tokio::test]
async fn track_then_get_returns_latest_subfolder_documents() {
    let store_dir = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    let t = test_app(store_dir.path());

    write_files(&root.path().join("week-1"), &["old.docx"]);
    write_files(
        &root.path().join("week-2"),
        &["a.docx", "b.XLSX", "notes.txt", "deck.pptx"],
    );
    fs::create_dir(root.path().join("week-2").join("nested.docx")).unwrap();
    set_mtime(&root.path().join("week-1"), at(0));
    set_mtime(&root.path().join("week-2"), at(60));

    let response = t
        .app
        .handle(Request::TrackFolder {
            path: root.path().to_path_buf(),
        })
        .await;
    assert_eq!(response, Some(Response::FolderSaved));

    let Some(Response::GotFolder(payload)) = t.app.handle(Request::GetTrackedFolder).await else {
        panic!("expected got-folder");
    };
    assert_eq!(payload.folder.as_deref(), Some(root.path()));

    let files = payload.files.unwrap();
    let mut names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
    names.sort();
    assert_eq!(names, vec!["a.docx", "b.XLSX", "deck.pptx"]);
    for file in &files {
        assert_eq!(file.status, FileStatus::NotConverted);
        assert!(file.path.starts_with(root.path().join("week-2")));
    }
}

#[tokio::test]
async fn staging_output_is_never_the_latest_subfolder() {
    let store_dir = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    let t = test_app(store_dir.path());

    write_files(&root.path().join("week-1"), &["memo.docx"]);
    write_files(&root.path().join("SOURCE").join("NATIVE"), &["copy.docx"]);
    write_files(&root.path().join("PDF"), &["copy.docx"]);
    set_mtime(&root.path().join("week-1"), at(0));
    set_mtime(&root.path().join("SOURCE"), at(500));
    set_mtime(&root.path().join("PDF"), at(900));

    t.app.track_folder(root.path()).unwrap();
    let tracked = t.app.tracked_folder().unwrap();
    let names: Vec<&str> = tracked.files().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["memo.docx"]);
}

#[tokio::test]
async fn tracked_folder_without_subfolders_has_no_files() {
    let store_dir = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    let t = test_app(store_dir.path());
    write_files(root.path(), &["loose.docx"]);

    t.app.track_folder(root.path()).unwrap();
    assert_eq!(
        t.app.tracked_folder().unwrap(),
        TrackedFolder::Tracked {
            folder: root.path().to_path_buf(),
            files: Vec::new(),
        }
    );
}

#[tokio::test]
async fn retracking_overwrites_the_single_record() {
    let store_dir = TempDir::new().unwrap();
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    let t = test_app(store_dir.path());

    t.app.track_folder(first.path()).unwrap();
    t.app.track_folder(second.path()).unwrap();

    assert_eq!(t.store.ids().unwrap(), vec![LAST_FOLDER_ID.to_string()]);
    let record = t.store.find_one(LAST_FOLDER_ID).unwrap().unwrap();
    assert_eq!(record["path"], second.path().to_str().unwrap());
    assert_eq!(
        t.app.tracked_folder().unwrap().folder().map(|p| p.as_path()),
        Some(second.path())
    );
}

#[tokio::test]
async fn tracking_the_same_folder_twice_is_idempotent() {
    let store_dir = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    let t = test_app(store_dir.path());

    t.app.track_folder(root.path()).unwrap();
    let before = t.store.find_one(LAST_FOLDER_ID).unwrap().unwrap();
    t.app.track_folder(root.path()).unwrap();
    let after = t.store.find_one(LAST_FOLDER_ID).unwrap().unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn tracking_a_file_is_rejected() {
    let store_dir = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    let t = test_app(store_dir.path());
    let file = write_files(root.path(), &["a.docx"]).remove(0);

    assert!(t.app.handle(Request::TrackFolder { path: file }).await.is_none());
    assert_eq!(t.notifier.drain().len(), 1);
    assert!(t.store.find_one(LAST_FOLDER_ID).unwrap().is_none());
}
