//! Non-recursive directory listings: subdirectories and candidate documents.

use crate::error::ScanError;
use crate::props::modified_millis;
use crate::types::{DirectoryEntry, DocumentSeed};
use std::path::Path;

/// Office document extensions recognized when no override is configured.
pub const DEFAULT_DOCUMENT_EXTENSIONS: [&str; 3] = ["docx", "xlsx", "pptx"];

/// Immediate subdirectories of `root` with their modification times, in
/// enumeration order. Symlinks are followed when deciding what is a directory.
pub fn list_subdirectories(root: &Path) -> Result<Vec<DirectoryEntry>, ScanError> {
    let entries = std::fs::read_dir(root).map_err(|source| ScanError::ReadDir {
        path: root.to_path_buf(),
        source,
    })?;

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| ScanError::ReadDir {
            path: root.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let metadata = std::fs::metadata(&path).map_err(|source| ScanError::Metadata {
            path: path.clone(),
            source,
        })?;
        if !metadata.is_dir() {
            continue;
        }
        let updated_at = modified_millis(&path, &metadata)?;
        dirs.push(DirectoryEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            path,
            updated_at,
        });
    }
    Ok(dirs)
}

/// Regular files directly inside `folder` whose extension is in `extensions`.
///
/// Extensions are compared without the leading dot and ignoring ASCII case.
pub fn list_candidate_documents(
    folder: &Path,
    extensions: &[String],
) -> Result<Vec<DocumentSeed>, ScanError> {
    let entries = std::fs::read_dir(folder).map_err(|source| ScanError::ReadDir {
        path: folder.to_path_buf(),
        source,
    })?;

    let mut seeds = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| ScanError::ReadDir {
            path: folder.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let metadata = std::fs::metadata(&path).map_err(|source| ScanError::Metadata {
            path: path.clone(),
            source,
        })?;
        if !metadata.is_file() {
            continue;
        }
        let Some(extension) = path.extension().map(|e| e.to_string_lossy().into_owned()) else {
            continue;
        };
        if !is_recognized(&extension, extensions) {
            continue;
        }
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        seeds.push(DocumentSeed {
            stem,
            extension,
            path,
            parent: folder.to_path_buf(),
        });
    }

    tracing::debug!(
        folder = %folder.display(),
        count = seeds.len(),
        "Listed candidate documents"
    );
    Ok(seeds)
}

fn is_recognized(extension: &str, extensions: &[String]) -> bool {
    extensions
        .iter()
        .any(|known| known.trim_start_matches('.').eq_ignore_ascii_case(extension))
}

/// The default extension set as owned strings.
pub fn default_extensions() -> Vec<String> {
    DEFAULT_DOCUMENT_EXTENSIONS
        .iter()
        .map(|e| e.to_string())
        .collect()
}
