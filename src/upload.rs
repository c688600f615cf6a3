//! Document upload to a Dropbox-style content endpoint.
//!
//! A single POST per file. No retries; conflicting names are left to the remote
//! service's own auto-rename.

use crate::config::UploadConfig;
use crate::error::UploadError;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use tracing::{debug, info};

/// Header carrying the JSON upload arguments.
pub const DROPBOX_API_ARG: &str = "dropbox-api-arg";

/// Sends a document's bytes to remote storage under `name`.
#[async_trait]
pub trait DocumentUploader: Send + Sync {
    async fn upload(&self, name: &str, bytes: Vec<u8>) -> Result<(), UploadError>;
}

/// Upload arguments carried in the `Dropbox-API-Arg` header.
#[derive(Debug, Clone, Serialize)]
pub struct UploadArg {
    pub path: String,
    pub mode: &'static str,
    pub autorename: bool,
    pub mute: bool,
    pub strict_conflict: bool,
}

impl UploadArg {
    /// Add `name` at the root of the remote folder, renaming on conflict.
    pub fn for_name(name: &str) -> Self {
        Self {
            path: format!("/{}", name.trim_start_matches('/')),
            mode: "add",
            autorename: true,
            mute: false,
            strict_conflict: false,
        }
    }
}

pub struct DropboxUploader {
    client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
}

impl DropboxUploader {
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.endpoint.clone(),
            token: config.resolve_token(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Headers for uploading `name`.
    pub fn headers(&self, name: &str) -> Result<HeaderMap, UploadError> {
        let token = self.token.as_deref().ok_or(UploadError::MissingToken)?;
        let arg = serde_json::to_string(&UploadArg::for_name(name))
            .map(|json| escape_non_ascii(&json))
            .map_err(|e| UploadError::InvalidHeader(e.to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| UploadError::InvalidHeader(e.to_string()))?,
        );
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/octet-stream"),
        );
        headers.insert(
            DROPBOX_API_ARG,
            HeaderValue::from_str(&arg).map_err(|e| UploadError::InvalidHeader(e.to_string()))?,
        );
        Ok(headers)
    }
}

/// Header values must be ASCII; every other char becomes a JSON `\uXXXX`
/// escape, as UTF-16 surrogate pairs above the BMP.
fn escape_non_ascii(json: &str) -> String {
    let mut escaped = String::with_capacity(json.len());
    let mut units = [0u16; 2];
    for c in json.chars() {
        if c.is_ascii() {
            escaped.push(c);
            continue;
        }
        for unit in c.encode_utf16(&mut units) {
            escaped.push_str(&format!("\\u{:04x}", unit));
        }
    }
    escaped
}

#[async_trait]
impl DocumentUploader for DropboxUploader {
    async fn upload(&self, name: &str, bytes: Vec<u8>) -> Result<(), UploadError> {
        let headers = self.headers(name)?;
        debug!(name, bytes = bytes.len(), endpoint = %self.endpoint, "Uploading document");

        let response = self
            .client
            .post(&self.endpoint)
            .headers(headers)
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UploadError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        info!(name, "Document uploaded");
        Ok(())
    }
}
