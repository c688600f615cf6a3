//! Error types for scanning, the state store, staging and uploads.

use std::path::PathBuf;
use thiserror::Error;

/// A directory or file could not be read while scanning.
///
/// Scans never return partial results; the first failure aborts the scan.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Failed to read directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to stat {path}: {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Failed to read working directory: {0}")]
    CurrentDir(#[source] std::io::Error),
}

/// The local document store failed a read or write.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to open store at {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: sled::Error,
    },

    #[error("Store backend error: {0}")]
    Backend(#[from] sled::Error),

    #[error("Corrupt document {id}: {source}")]
    Corrupt {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode document {id}: {source}")]
    Encode {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Document {0} is not a JSON object")]
    NotAnObject(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Any failure while tearing down, creating or filling the staging tree.
#[derive(Debug, Error)]
pub enum StagingError {
    #[error("Failed to clear staging output {path}: {source}")]
    Clear {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create staging directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{failed} of {total} files failed to copy into {native}")]
    Copy {
        native: PathBuf,
        failed: usize,
        total: usize,
        failures: Vec<CopyFailure>,
    },

    #[error("Failed to publish staged tree {from} to {to}: {source}")]
    Publish {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One file that could not be copied during staging.
#[derive(Debug)]
pub struct CopyFailure {
    pub source: PathBuf,
    pub target: PathBuf,
    pub error: std::io::Error,
}

/// The outbound document upload failed.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Upload token is not configured")]
    MissingToken,

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Upload request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Upload rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Invalid upload header: {0}")]
    InvalidHeader(String),
}

/// Top-level error surfaced by the application boundary and the CLI.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Scan error: {0}")]
    ScanError(#[from] ScanError),

    #[error("Storage error: {0}")]
    StorageError(#[from] StoreError),

    #[error("Staging error: {0}")]
    StagingError(#[from] StagingError),

    #[error("Upload error: {0}")]
    UploadError(#[from] UploadError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("{0}")]
    OperationFailed(String),

    #[error("Failed to start async runtime: {0}")]
    RuntimeError(#[source] std::io::Error),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
