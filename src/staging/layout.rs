//! Directory layout of a staging run.

use std::path::{Path, PathBuf};

/// Top-level staging directory created next to the base folder.
pub const SOURCE_DIR: &str = "SOURCE";
/// Receives the copied native documents.
pub const NATIVE_DIR: &str = "NATIVE";
/// Left empty for the external converter.
pub const PDF_DIR: &str = "PDF";
/// Scratch tree used by atomic staging before it replaces `SOURCE`.
pub const PARTIAL_DIR: &str = ".SOURCE.partial";

/// Directory names that are never treated as document folders when scanning.
///
/// Derived from the names staging creates, so the two cannot drift apart.
pub const RESERVED_DIR_NAMES: [&str; 4] = [SOURCE_DIR, NATIVE_DIR, PDF_DIR, PARTIAL_DIR];

/// Whether `name` is one of the staging directory names (exact, case-sensitive).
pub fn is_reserved_dir_name(name: &str) -> bool {
    RESERVED_DIR_NAMES.contains(&name)
}

/// Resolved paths of a staging tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingLayout {
    /// Directory the tree is created in: the parent of the base folder.
    pub root: PathBuf,
    pub source: PathBuf,
    pub native: PathBuf,
    pub pdf: PathBuf,
}

impl StagingLayout {
    /// Layout for staging the documents of `base_folder`.
    ///
    /// The tree goes one level up from the base folder. A relative single
    /// component goes up to `.`; a filesystem root stages into itself.
    pub fn for_base_folder(base_folder: &Path) -> Self {
        let root = match base_folder.parent() {
            Some(parent) if parent.as_os_str().is_empty() => PathBuf::from("."),
            Some(parent) => parent.to_path_buf(),
            None => base_folder.to_path_buf(),
        };
        let source = root.join(SOURCE_DIR);
        Self::with_source(root, source)
    }

    /// Layout whose top-level directory is `source` instead of `<root>/SOURCE`.
    pub fn with_source(root: PathBuf, source: PathBuf) -> Self {
        let native = source.join(NATIVE_DIR);
        let pdf = source.join(PDF_DIR);
        Self {
            root,
            source,
            native,
            pdf,
        }
    }

    /// The scratch layout used by atomic staging.
    pub fn partial(&self) -> Self {
        Self::with_source(self.root.clone(), self.root.join(PARTIAL_DIR))
    }
}
