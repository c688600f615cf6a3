use tempfile::TempDir;
use uploadtracker::config::TrackerConfig;
use uploadtracker::tooling::cli::{CliContext, Commands};
use uploadtracker::types::FileStatus;

use crate::integration::support::{at, names_in, set_mtime, write_files};

fn cli(store_dir: &TempDir) -> CliContext {
    let mut config = TrackerConfig::default();
    config.store.path = Some(store_dir.path().join("db"));
    CliContext::from_config(config).unwrap()
}

#[test]
fn show_before_track_prints_hint() {
    let store_dir = TempDir::new().unwrap();
    let output = cli(&store_dir)
        .execute(&Commands::Show {
            format: "text".to_string(),
        })
        .unwrap();
    assert!(output.contains("No folder is tracked"));
}

#[test]
fn track_show_status_stage_flow() {
    let store_dir = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    write_files(&root.path().join("week-1"), &["old.docx"]);
    write_files(&root.path().join("week-2"), &["report.docx", "sheet.xlsx"]);
    set_mtime(&root.path().join("week-1"), at(0));
    set_mtime(&root.path().join("week-2"), at(100));
    let cli = cli(&store_dir);

    cli.execute(&Commands::Track {
        path: root.path().to_path_buf(),
    })
    .unwrap();

    let output = cli
        .execute(&Commands::Show {
            format: "json".to_string(),
        })
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["folder"], root.path().to_str().unwrap());
    let files = parsed["files"].as_array().unwrap();
    assert_eq!(files.len(), 2);
    let report_id = files
        .iter()
        .find(|f| f["name"] == "report.docx")
        .and_then(|f| f["id"].as_str())
        .unwrap()
        .to_string();

    let output = cli
        .execute(&Commands::Status {
            file_id: report_id,
            status: "converted".to_string(),
        })
        .unwrap();
    assert_eq!(output, "Marked report.docx as Converted");

    let output = cli.execute(&Commands::Stage { base: None }).unwrap();
    assert!(output.contains("NATIVE"));
    assert_eq!(
        names_in(&root.path().join("SOURCE").join("NATIVE")),
        vec!["report.docx", "sheet.xlsx"]
    );
}

#[test]
fn status_for_unknown_document_fails() {
    let store_dir = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    write_files(&root.path().join("week-1"), &["a.docx"]);
    let cli = cli(&store_dir);
    cli.execute(&Commands::Track {
        path: root.path().to_path_buf(),
    })
    .unwrap();

    assert!(cli
        .execute(&Commands::Status {
            file_id: "nope".to_string(),
            status: "converted".to_string(),
        })
        .is_err());
    assert!(cli
        .execute(&Commands::Status {
            file_id: "nope".to_string(),
            status: "done".to_string(),
        })
        .is_err());
}

#[test]
fn stage_without_tracked_folder_fails() {
    let store_dir = TempDir::new().unwrap();
    assert!(cli(&store_dir)
        .execute(&Commands::Stage { base: None })
        .is_err());
}

#[test]
fn track_of_missing_folder_reports_error() {
    let store_dir = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    let err = cli(&store_dir)
        .execute(&Commands::Track {
            path: root.path().join("missing"),
        })
        .unwrap_err();
    assert!(err.to_string().contains("not a directory"));
}

#[test]
fn scan_lists_nested_files() {
    let store_dir = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    write_files(&root.path().join("a").join("b"), &["deep.docx"]);

    let output = cli(&store_dir)
        .execute(&Commands::Scan {
            path: root.path().to_path_buf(),
        })
        .unwrap();
    assert!(output.contains("deep.docx"));
    assert!(output.ends_with(&format!("1 file(s) under {}", root.path().display())));
}

fn document_id(cli: &CliContext, name: &str) -> String {
    let output = cli
        .execute(&Commands::Show {
            format: "json".to_string(),
        })
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    parsed["files"]
        .as_array()
        .unwrap()
        .iter()
        .find(|f| f["name"] == name)
        .and_then(|f| f["id"].as_str())
        .unwrap()
        .to_string()
}

#[test]
fn status_updates_accumulate_across_documents() {
    let store_dir = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    write_files(&root.path().join("week-1"), &["a.docx", "b.docx", "c.docx"]);
    let cli = cli(&store_dir);
    cli.execute(&Commands::Track {
        path: root.path().to_path_buf(),
    })
    .unwrap();

    let a = document_id(&cli, "a.docx");
    let b = document_id(&cli, "b.docx");
    cli.execute(&Commands::Status {
        file_id: a,
        status: "converted".to_string(),
    })
    .unwrap();
    cli.execute(&Commands::Status {
        file_id: b,
        status: "failed".to_string(),
    })
    .unwrap();

    let record = cli.app().folder_record().unwrap().unwrap();
    let status_of = |name: &str| {
        record
            .files
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.status)
            .unwrap()
    };
    assert_eq!(status_of("a.docx"), FileStatus::Converted);
    assert_eq!(status_of("b.docx"), FileStatus::Failed);
    assert_eq!(status_of("c.docx"), FileStatus::NotConverted);
}

#[test]
fn track_prints_the_stored_location() {
    let store_dir = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    let cli = cli(&store_dir);

    let output = cli
        .execute(&Commands::Track {
            path: root.path().to_path_buf(),
        })
        .unwrap();

    let stored = cli.app().folder_record().unwrap().unwrap().path;
    assert!(stored.is_absolute());
    assert_eq!(output, format!("Tracking {}", stored.display()));
}
