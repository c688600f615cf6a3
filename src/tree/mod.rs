//! Filesystem scanning: recursive file enumeration and single-level listings.

pub mod listing;
pub mod walker;

pub use listing::{
    default_extensions, list_candidate_documents, list_subdirectories,
    DEFAULT_DOCUMENT_EXTENSIONS,
};
pub use walker::{list_files_recursive, FileWalker};
