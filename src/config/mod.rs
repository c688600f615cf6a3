//! Configuration
//!
//! Layered configuration: built-in defaults, the global config file, an explicit
//! file, then `UPLOADTRACKER__SECTION__KEY` environment variables.

pub mod facade;
pub mod merge;
pub mod paths;
pub mod sources;
pub mod store_paths;

pub use facade::ConfigLoader;
pub use paths::xdg_root as xdg;
pub use store_paths::StoreConfig;

use crate::logging::LoggingConfig;
use crate::staging::StagingMode;
use crate::tree::default_extensions;
use serde::Deserialize;

/// Environment variable read when no upload token is configured.
pub const DROPBOX_TOKEN_ENV: &str = "UPLOADTRACKER_DROPBOX_TOKEN";

/// Dropbox content upload endpoint.
pub const DEFAULT_UPLOAD_ENDPOINT: &str = "https://content.dropboxapi.com/2/files/upload";

/// Full application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub store: StoreConfig,
    pub documents: DocumentsConfig,
    pub staging: StagingConfig,
    pub upload: UploadConfig,
    pub logging: LoggingConfig,
}

/// Which files count as convertible documents.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DocumentsConfig {
    /// Extensions without the leading dot, matched ignoring ASCII case.
    pub extensions: Vec<String>,
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StagingConfig {
    pub mode: StagingMode,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub endpoint: String,
    /// Bearer token; falls back to `UPLOADTRACKER_DROPBOX_TOKEN`.
    pub token: Option<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_UPLOAD_ENDPOINT.to_string(),
            token: None,
        }
    }
}

impl UploadConfig {
    pub fn resolve_token(&self) -> Option<String> {
        self.token
            .clone()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| {
                std::env::var(DROPBOX_TOKEN_ENV)
                    .ok()
                    .filter(|t| !t.trim().is_empty())
            })
    }
}

impl TrackerConfig {
    /// Validate values serde cannot check on its own.
    pub fn validate(&self) -> Result<(), String> {
        if self.documents.extensions.is_empty() {
            return Err("documents.extensions cannot be empty".to_string());
        }
        if self
            .documents
            .extensions
            .iter()
            .any(|e| e.trim_start_matches('.').trim().is_empty())
        {
            return Err("documents.extensions cannot contain empty entries".to_string());
        }
        if self.upload.endpoint.trim().is_empty() {
            return Err("upload.endpoint cannot be empty".to_string());
        }
        Ok(())
    }
}
