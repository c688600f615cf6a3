//! Folder resolution
//!
//! Picks the most recently modified document folder below the tracked root and
//! collects its office documents.

use crate::error::{ApiError, ScanError, StoreError};
use crate::props::describe;
use crate::staging::is_reserved_dir_name;
use crate::store::DocumentStore;
use crate::tree::{default_extensions, list_candidate_documents, list_subdirectories};
use crate::types::{DirectoryEntry, FileDescriptor, FolderRecord, TrackedFolder, LAST_FOLDER_ID};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolves the latest subfolder of a root and the documents inside it.
#[derive(Debug, Clone)]
pub struct FolderResolver {
    extensions: Vec<String>,
}

impl Default for FolderResolver {
    fn default() -> Self {
        Self::new(default_extensions())
    }
}

impl FolderResolver {
    pub fn new(extensions: Vec<String>) -> Self {
        Self { extensions }
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Candidate documents of `folder`, described at scan time.
    pub fn collect_documents(&self, folder: &Path) -> Result<Vec<FileDescriptor>, ScanError> {
        list_candidate_documents(folder, &self.extensions)?
            .iter()
            .map(|seed| describe(&seed.path))
            .collect()
    }

    /// Resolve the tracked folder recorded in `store`.
    ///
    /// Documents always come from a fresh scan of the latest subfolder; statuses
    /// stored by earlier status updates are not merged back in.
    pub fn resolve_tracked_folder(
        &self,
        store: &dyn DocumentStore,
    ) -> Result<TrackedFolder, ApiError> {
        let Some(record) = read_folder_record(store)? else {
            debug!("No tracked folder recorded");
            return Ok(TrackedFolder::Untracked);
        };

        let files = match resolve_latest_subfolder(&record.path)? {
            Some(latest) => self.collect_documents(&latest)?,
            None => Vec::new(),
        };
        debug!(
            folder = %record.path.display(),
            files = files.len(),
            "Resolved tracked folder"
        );
        Ok(TrackedFolder::Tracked {
            folder: record.path,
            files,
        })
    }
}

/// The tracked-folder record under the sentinel id, if any.
pub fn read_folder_record(store: &dyn DocumentStore) -> Result<Option<FolderRecord>, StoreError> {
    store
        .find_one(LAST_FOLDER_ID)?
        .map(|document| {
            serde_json::from_value(document).map_err(|source| StoreError::Corrupt {
                id: LAST_FOLDER_ID.to_string(),
                source,
            })
        })
        .transpose()
}

/// The most recently modified subdirectory of `root`, skipping staging output.
pub fn resolve_latest_subfolder(root: &Path) -> Result<Option<PathBuf>, ScanError> {
    let candidates = list_subdirectories(root)?
        .into_iter()
        .filter(|dir| !is_reserved_dir_name(&dir.name));
    let latest = pick_latest(candidates).map(|dir| dir.path);
    debug!(
        root = %root.display(),
        latest = ?latest,
        "Resolved latest subfolder"
    );
    Ok(latest)
}

/// Entry with the greatest timestamp; on ties the earliest entry wins.
pub fn pick_latest<I>(entries: I) -> Option<DirectoryEntry>
where
    I: IntoIterator<Item = DirectoryEntry>,
{
    entries.into_iter().fold(None, |best, entry| match best {
        Some(current) if current.updated_at >= entry.updated_at => Some(current),
        _ => Some(entry),
    })
}
