//! Core records shared by the scanner, the store and the boundary.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Store key of the singleton tracked-folder record.
pub const LAST_FOLDER_ID: &str = "lastFolder";

/// Conversion status of a single document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FileStatus {
    #[default]
    #[serde(rename = "Not Converted")]
    NotConverted,
    Converting,
    Converted,
    Failed,
}

impl FileStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileStatus::NotConverted => "Not Converted",
            FileStatus::Converting => "Converting",
            FileStatus::Converted => "Converted",
            FileStatus::Failed => "Failed",
        }
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match folded.as_str() {
            "notconverted" => Ok(FileStatus::NotConverted),
            "converting" => Ok(FileStatus::Converting),
            "converted" => Ok(FileStatus::Converted),
            "failed" => Ok(FileStatus::Failed),
            _ => Err(format!(
                "Unknown status '{}' (expected not-converted, converting, converted or failed)",
                s
            )),
        }
    }
}

/// Descriptive metadata for one document, captured at scan time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDescriptor {
    /// Derived from `path` only; see [`crate::props::derive_file_id`].
    pub id: String,
    pub path: PathBuf,
    /// File name including its extension.
    pub name: String,
    /// Extension without the leading dot; empty when the file has none.
    pub extension: String,
    /// Human-readable size; display only.
    pub size: String,
    /// Modification time in epoch milliseconds.
    pub updated_at: i64,
    #[serde(default)]
    pub status: FileStatus,
}

/// A direct child of a folder whose extension marks it as a convertible document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSeed {
    /// Base name without the extension.
    pub stem: String,
    pub extension: String,
    pub path: PathBuf,
    pub parent: PathBuf,
}

/// An immediate subdirectory with its modification time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: String,
    pub path: PathBuf,
    pub updated_at: i64,
}

/// The persisted tracked-folder document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderRecord {
    pub id: String,
    #[serde(alias = "folder")]
    pub path: PathBuf,
    #[serde(default)]
    pub files: Vec<FileDescriptor>,
}

/// Result of resolving the tracked folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackedFolder {
    /// No folder has been tracked yet.
    Untracked,
    Tracked {
        folder: PathBuf,
        files: Vec<FileDescriptor>,
    },
}

impl TrackedFolder {
    pub fn folder(&self) -> Option<&PathBuf> {
        match self {
            TrackedFolder::Untracked => None,
            TrackedFolder::Tracked { folder, .. } => Some(folder),
        }
    }

    pub fn files(&self) -> &[FileDescriptor] {
        match self {
            TrackedFolder::Untracked => &[],
            TrackedFolder::Tracked { files, .. } => files,
        }
    }
}
