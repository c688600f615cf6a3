//! Depth-first file enumeration.

use crate::error::ScanError;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Lazy, stack-based walk over every regular file below a root.
///
/// Directories are descended into but never yielded. The first unreadable
/// entry is yielded as an error and ends the walk; a new walker rescans from
/// scratch.
pub struct FileWalker {
    root: PathBuf,
    inner: walkdir::IntoIter,
    finished: bool,
}

impl FileWalker {
    pub fn new(root: &Path) -> Self {
        let inner = WalkDir::new(root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();
        Self {
            root: root.to_path_buf(),
            inner,
            finished: false,
        }
    }
}

impl Iterator for FileWalker {
    type Item = Result<PathBuf, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        loop {
            match self.inner.next() {
                None => {
                    self.finished = true;
                    return None;
                }
                Some(Ok(entry)) => {
                    if entry.file_type().is_file() {
                        return Some(Ok(entry.into_path()));
                    }
                }
                Some(Err(err)) => {
                    self.finished = true;
                    let path = err
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| self.root.clone());
                    return Some(Err(ScanError::Walk { path, source: err }));
                }
            }
        }
    }
}

/// Every file below `root`, at any depth. Aborts on the first unreadable entry.
pub fn list_files_recursive(root: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let files = FileWalker::new(root).collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(root = %root.display(), count = files.len(), "Listed files recursively");
    Ok(files)
}
