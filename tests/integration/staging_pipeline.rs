use std::fs;
use tempfile::TempDir;
use uploadtracker::error::StagingError;
use uploadtracker::staging::{StageFile, StagingMode, StagingPipeline};

use crate::integration::support::{names_in, write_files};

fn stage_files(paths: &[std::path::PathBuf]) -> Vec<StageFile> {
    paths
        .iter()
        .map(|path| StageFile {
            path: path.clone(),
            name: path.file_name().unwrap().to_string_lossy().into_owned(),
        })
        .collect()
}

#[tokio::test]
async fn empty_request_creates_native_and_pdf() {
    let root = TempDir::new().unwrap();
    let base = root.path().join("week-1");
    fs::create_dir(&base).unwrap();

    let report = StagingPipeline::default().stage(&base, &[]).await.unwrap();

    assert!(report.copied.is_empty());
    assert!(root.path().join("SOURCE").join("NATIVE").is_dir());
    assert!(root.path().join("SOURCE").join("PDF").is_dir());
    assert!(names_in(&root.path().join("SOURCE").join("NATIVE")).is_empty());
    assert!(report.confirmation().contains("NATIVE"));
}

#[tokio::test]
async fn previous_output_is_removed_before_copying() {
    let root = TempDir::new().unwrap();
    let base = root.path().join("week-2");
    let docs = write_files(&base, &["a.docx", "b.pptx"]);
    write_files(&root.path().join("SOURCE").join("NATIVE"), &["stale.docx"]);
    write_files(&root.path().join("SOURCE").join("PDF"), &["stale.pdf"]);
    write_files(&root.path().join("SOURCE"), &["leftover.txt"]);

    let report = StagingPipeline::default()
        .stage(&base, &stage_files(&docs))
        .await
        .unwrap();

    assert_eq!(report.copied.len(), 2);
    assert_eq!(names_in(&root.path().join("SOURCE")), vec!["NATIVE", "PDF"]);
    assert_eq!(
        names_in(&root.path().join("SOURCE").join("NATIVE")),
        vec!["a.docx", "b.pptx"]
    );
    assert!(names_in(&root.path().join("SOURCE").join("PDF")).is_empty());
    assert_eq!(
        fs::read(root.path().join("SOURCE").join("NATIVE").join("a.docx")).unwrap(),
        b"a.docx"
    );
}

#[tokio::test]
async fn one_missing_file_fails_but_keeps_the_other_copies() {
    let root = TempDir::new().unwrap();
    let base = root.path().join("week-3");
    let mut docs = write_files(&base, &["a.docx", "b.xlsx", "c.pptx"]);
    fs::remove_file(&docs[1]).unwrap();
    docs.push(base.join("d.docx"));
    fs::write(&docs[3], b"d").unwrap();

    let err = StagingPipeline::default()
        .stage(&base, &stage_files(&docs))
        .await
        .unwrap_err();

    match err {
        StagingError::Copy {
            failed,
            total,
            failures,
            ..
        } => {
            assert_eq!(failed, 1);
            assert_eq!(total, 4);
            assert_eq!(failures[0].source, base.join("b.xlsx"));
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert_eq!(
        names_in(&root.path().join("SOURCE").join("NATIVE")),
        vec!["a.docx", "c.pptx", "d.docx"]
    );
}

#[tokio::test]
async fn atomic_mode_keeps_previous_output_on_failure() {
    let root = TempDir::new().unwrap();
    let base = root.path().join("week-4");
    let mut docs = write_files(&base, &["a.docx"]);
    docs.push(base.join("missing.docx"));
    write_files(&root.path().join("SOURCE").join("NATIVE"), &["previous.docx"]);

    let pipeline = StagingPipeline::new(StagingMode::Atomic);
    assert!(pipeline.stage(&base, &stage_files(&docs)).await.is_err());

    assert_eq!(
        names_in(&root.path().join("SOURCE").join("NATIVE")),
        vec!["previous.docx"]
    );
    assert!(!root.path().join(".SOURCE.partial").exists());
}

#[tokio::test]
async fn restaging_starts_over() {
    let root = TempDir::new().unwrap();
    let base = root.path().join("week-5");
    let docs = write_files(&base, &["a.docx", "b.docx"]);
    let pipeline = StagingPipeline::default();

    pipeline.stage(&base, &stage_files(&docs)).await.unwrap();
    pipeline.stage(&base, &stage_files(&docs[..1])).await.unwrap();

    assert_eq!(
        names_in(&root.path().join("SOURCE").join("NATIVE")),
        vec!["a.docx"]
    );
}
