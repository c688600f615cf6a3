//! Application boundary
//!
//! Turns [`Request`]s from the presentation layer into exactly one outcome each:
//! a [`Response`], an error notice, or (for staging) both a response and a notice.
//! Errors never escape `handle`; they are logged and reported through the
//! injected [`Notifier`].

pub mod notify;
pub mod protocol;

pub use notify::{MemoryNotifier, Notice, NoticeKind, Notifier, TracingNotifier};
pub use protocol::{FolderPayload, Request, Response};

use crate::config::TrackerConfig;
use crate::error::{ApiError, StoreError, UploadError};
use crate::props::absolute_path;
use crate::resolver::{read_folder_record, FolderResolver};
use crate::staging::{StageFile, StagingPipeline, StagingReport};
use crate::store::DocumentStore;
use crate::types::{FileDescriptor, FolderRecord, TrackedFolder, LAST_FOLDER_ID};
use crate::upload::{DocumentUploader, DropboxUploader};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Notice shown when staging fails; the cause is only logged.
pub const STAGING_FAILURE_NOTICE: &str = "Internal Error";

/// Shared services behind the request boundary.
pub struct AppContext {
    store: Arc<dyn DocumentStore>,
    resolver: FolderResolver,
    pipeline: StagingPipeline,
    uploader: Arc<dyn DocumentUploader>,
    notifier: Arc<dyn Notifier>,
}

impl AppContext {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        resolver: FolderResolver,
        pipeline: StagingPipeline,
        uploader: Arc<dyn DocumentUploader>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            resolver,
            pipeline,
            uploader,
            notifier,
        }
    }

    /// Wire the services described by `config` around an opened store.
    pub fn from_config(
        config: &TrackerConfig,
        store: Arc<dyn DocumentStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self::new(
            store,
            FolderResolver::new(config.documents.extensions.clone()),
            StagingPipeline::new(config.staging.mode),
            Arc::new(DropboxUploader::new(&config.upload)),
            notifier,
        )
    }

    pub fn resolver(&self) -> &FolderResolver {
        &self.resolver
    }

    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    /// Dispatch one request.
    ///
    /// Returns `None` when the request failed; the failure has then been reported
    /// through the notifier.
    pub async fn handle(&self, request: Request) -> Option<Response> {
        match request {
            Request::TrackFolder { path } => match self.track_folder(&path) {
                Ok(_) => Some(Response::FolderSaved),
                Err(err) => self.fail("track-folder", &err),
            },
            Request::GetTrackedFolder => match self.tracked_folder() {
                Ok(tracked) => Some(Response::GotFolder(tracked.into())),
                Err(err) => self.fail("get-tracked-folder", &err),
            },
            Request::UpdateFileStatus { id, files } => {
                match self.update_file_status(&id, &files) {
                    Ok(matched) => {
                        if !matched {
                            warn!(id = %id, "No record to update");
                        }
                        Some(Response::FolderSaved)
                    }
                    Err(err) => self.fail("update-file-status", &err),
                }
            }
            Request::StartStaging { base_folder, files } => {
                match self.start_staging(&base_folder, &files).await {
                    Ok(report) => self
                        .notifier
                        .notify(NoticeKind::Info, &report.confirmation()),
                    Err(err) => {
                        error!(operation = "start-staging", error = %err, "Request failed");
                        self.notifier
                            .notify(NoticeKind::Error, STAGING_FAILURE_NOTICE);
                    }
                }
                Some(Response::StagingDone)
            }
            Request::UploadFile { file_path, name } => {
                match self.upload_file(&file_path, &name).await {
                    Ok(()) => Some(Response::UploadFinished),
                    Err(err) => self.fail("upload-file", &err),
                }
            }
        }
    }

    fn fail(&self, operation: &str, err: &ApiError) -> Option<Response> {
        error!(operation, error = %err, "Request failed");
        self.notifier.notify(NoticeKind::Error, &err.to_string());
        None
    }

    /// Record `path` as the tracked folder, returning the stored location.
    ///
    /// Relative paths are made absolute against the working directory; symlinks
    /// are kept as given.
    pub fn track_folder(&self, path: &Path) -> Result<PathBuf, ApiError> {
        let folder = absolute_path(path)?;
        if !folder.is_dir() {
            return Err(ApiError::InvalidRequest(format!(
                "{} is not a directory",
                folder.display()
            )));
        }

        let patch = json!({
            "path": to_document_value(LAST_FOLDER_ID, &folder)?,
            "type": "info",
        });
        self.store.upsert(LAST_FOLDER_ID, &patch)?;
        info!(folder = %folder.display(), "Tracking folder");
        Ok(folder)
    }

    pub fn tracked_folder(&self) -> Result<TrackedFolder, ApiError> {
        self.resolver.resolve_tracked_folder(self.store.as_ref())
    }

    /// The stored tracked-folder record, including files saved by status updates.
    pub fn folder_record(&self) -> Result<Option<FolderRecord>, ApiError> {
        Ok(read_folder_record(self.store.as_ref())?)
    }

    /// Replace the `files` of the record `id`. Returns `false` when no record matched.
    pub fn update_file_status(
        &self,
        id: &str,
        files: &[FileDescriptor],
    ) -> Result<bool, ApiError> {
        let patch = json!({ "files": to_document_value(id, files)? });
        let matched = self.store.update(id, &patch)?;
        info!(id, files = files.len(), matched, "Updated file statuses");
        Ok(matched)
    }

    pub async fn start_staging(
        &self,
        base_folder: &Path,
        files: &[StageFile],
    ) -> Result<StagingReport, ApiError> {
        Ok(self.pipeline.stage(base_folder, files).await?)
    }

    /// Send the bytes of `file_path` to remote storage as `name`.
    pub async fn upload_file(&self, file_path: &Path, name: &str) -> Result<(), ApiError> {
        let bytes = tokio::fs::read(file_path)
            .await
            .map_err(|source| UploadError::Read {
                path: file_path.to_path_buf(),
                source,
            })?;
        self.uploader.upload(name, bytes).await?;
        Ok(())
    }
}

fn to_document_value<T: serde::Serialize + ?Sized>(id: &str, value: &T) -> Result<Value, StoreError> {
    serde_json::to_value(value).map_err(|source| StoreError::Encode {
        id: id.to_string(),
        source,
    })
}
