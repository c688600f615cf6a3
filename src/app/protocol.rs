//! Request and response messages exchanged with the presentation layer.
//!
//! Both enums are adjacently tagged: `{"operation": "track-folder", "payload": {...}}`
//! and `{"event": "got-folder", "payload": {...}}`.

use crate::staging::StageFile;
use crate::types::{FileDescriptor, TrackedFolder};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "operation", content = "payload", rename_all = "kebab-case")]
pub enum Request {
    TrackFolder {
        path: PathBuf,
    },
    GetTrackedFolder,
    UpdateFileStatus {
        id: String,
        files: Vec<FileDescriptor>,
    },
    StartStaging {
        #[serde(rename = "baseFolder")]
        base_folder: PathBuf,
        files: Vec<StageFile>,
    },
    UploadFile {
        #[serde(rename = "filePath")]
        file_path: PathBuf,
        name: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "kebab-case")]
pub enum Response {
    FolderSaved,
    GotFolder(FolderPayload),
    StagingDone,
    UploadFinished,
}

/// `got-folder` payload; both fields are absent when nothing is tracked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<FileDescriptor>>,
}

impl From<TrackedFolder> for FolderPayload {
    fn from(tracked: TrackedFolder) -> Self {
        match tracked {
            TrackedFolder::Untracked => Self::default(),
            TrackedFolder::Tracked { folder, files } => Self {
                folder: Some(folder),
                files: Some(files),
            },
        }
    }
}
