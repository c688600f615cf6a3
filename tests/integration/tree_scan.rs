use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use uploadtracker::resolver::resolve_latest_subfolder;
use uploadtracker::tree::{list_candidate_documents, list_files_recursive, list_subdirectories};

use crate::integration::support::{at, set_mtime, write_files};

#[test]
fn recursive_listing_reaches_every_depth() {
    let root = TempDir::new().unwrap();
    write_files(root.path(), &["top.txt"]);
    write_files(&root.path().join("a"), &["one.docx"]);
    write_files(&root.path().join("a").join("b"), &["two.docx"]);
    write_files(&root.path().join("a").join("b").join("c"), &["three.docx"]);
    fs::create_dir(root.path().join("empty")).unwrap();

    let mut files: Vec<PathBuf> = list_files_recursive(root.path())
        .unwrap()
        .into_iter()
        .map(|p| p.strip_prefix(root.path()).unwrap().to_path_buf())
        .collect();
    files.sort();

    assert_eq!(
        files,
        vec![
            PathBuf::from("a/b/c/three.docx"),
            PathBuf::from("a/b/two.docx"),
            PathBuf::from("a/one.docx"),
            PathBuf::from("top.txt"),
        ]
    );
}

#[test]
fn recursive_listing_of_missing_root_fails() {
    let root = TempDir::new().unwrap();
    assert!(list_files_recursive(&root.path().join("absent")).is_err());
}

#[test]
fn latest_subfolder_has_the_greatest_mtime() {
    let root = TempDir::new().unwrap();
    for (name, offset) in [("jan", 10), ("mar", 300), ("feb", 200)] {
        let dir = root.path().join(name);
        fs::create_dir(&dir).unwrap();
        set_mtime(&dir, at(offset));
    }

    let entries = list_subdirectories(root.path()).unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(
        resolve_latest_subfolder(root.path()).unwrap(),
        Some(root.path().join("mar"))
    );
}

#[test]
fn candidate_documents_are_direct_children_only() {
    let root = TempDir::new().unwrap();
    write_files(root.path(), &["a.docx", "b.pdf", "c.pptx"]);
    write_files(&root.path().join("deep"), &["d.docx"]);

    let mut stems: Vec<String> = list_candidate_documents(
        root.path(),
        &["docx".to_string(), "pptx".to_string()],
    )
    .unwrap()
    .into_iter()
    .map(|seed| seed.stem)
    .collect();
    stems.sort();
    assert_eq!(stems, vec!["a", "c"]);
}
