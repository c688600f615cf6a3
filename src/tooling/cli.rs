//! CLI Tooling
//!
//! Command-line interface for the tracker. Every command goes through the same
//! request boundary the presentation layer uses.

use crate::app::{AppContext, MemoryNotifier, NoticeKind, Notice, Request, Response};
use crate::config::{ConfigLoader, TrackerConfig};
use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::props::{absolute_path, file_name};
use crate::resolver::resolve_latest_subfolder;
use crate::staging::StageFile;
use crate::store::SledDocumentStore;
use crate::tooling::format::{format_folder_text, format_notice, format_scan_text};
use crate::tree::list_files_recursive;
use crate::types::{FileStatus, TrackedFolder, LAST_FOLDER_ID};
use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Upload tracker CLI - track a document folder and stage its latest documents
#[derive(Parser)]
#[command(name = "uploadtracker")]
#[command(about = "Track a document folder and stage its latest office files for conversion")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (layered over the global config)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Store location (overrides store.path)
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Track a folder of document subfolders
    Track {
        /// Folder to track
        path: PathBuf,
    },
    /// Show the tracked folder and the documents of its latest subfolder
    Show {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Set the conversion status of one document
    Status {
        /// Document id as printed by `show`
        file_id: String,
        /// not-converted, converting, converted or failed
        status: String,
    },
    /// Copy documents into SOURCE/NATIVE next to the base folder
    Stage {
        /// Folder whose documents are staged (default: latest subfolder of the tracked folder)
        #[arg(long)]
        base: Option<PathBuf>,
    },
    /// Upload one file to remote storage
    Upload {
        /// File to upload
        file: PathBuf,
        /// Remote name (default: the file name)
        #[arg(long)]
        name: Option<String>,
    },
    /// List every file below a folder
    Scan {
        /// Folder to walk
        path: PathBuf,
    },
}

impl Cli {
    /// Logging config with the log flags applied on top of `base`.
    pub fn logging_config(&self, base: &LoggingConfig) -> LoggingConfig {
        let mut config = base.clone();
        if self.verbose {
            config.level = "debug".to_string();
        }
        if let Some(level) = &self.log_level {
            config.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            config.output = output.clone();
        }
        if let Some(file) = &self.log_file {
            config.file = Some(file.clone());
        }
        config
    }
}

/// CLI context for executing commands
pub struct CliContext {
    runtime: tokio::runtime::Runtime,
    app: AppContext,
    notifier: Arc<MemoryNotifier>,
    config: TrackerConfig,
}

impl CliContext {
    /// Load configuration and open the store.
    pub fn new(config_path: Option<PathBuf>, store_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let mut config = match &config_path {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load()?,
        };
        if let Some(path) = store_path {
            config.store.path = Some(path);
        }
        Self::from_config(config)
    }

    /// Build a context from an already loaded configuration.
    pub fn from_config(config: TrackerConfig) -> Result<Self, ApiError> {
        let store_path = config.store.resolve_path()?;
        if let Some(parent) = store_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    ApiError::StorageError(crate::error::StoreError::IoError(e))
                })?;
            }
        }
        let store = Arc::new(SledDocumentStore::open(&store_path)?);
        let notifier = Arc::new(MemoryNotifier::new());
        let app = AppContext::from_config(&config, store, notifier.clone());
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(ApiError::RuntimeError)?;

        info!(store = %store_path.display(), "CLI context ready");
        Ok(Self {
            runtime,
            app,
            notifier,
            config,
        })
    }

    pub fn app(&self) -> &AppContext {
        &self.app
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Execute a CLI command
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Track { path } => {
                self.expect_response(Request::TrackFolder { path: path.clone() }, "folder-saved")?;
                let tracked = self
                    .app
                    .folder_record()?
                    .map(|record| record.path)
                    .unwrap_or_else(|| path.clone());
                Ok(format!("Tracking {}", tracked.display()))
            }
            Commands::Show { format } => self.handle_show(format),
            Commands::Status { file_id, status } => self.handle_status(file_id, status),
            Commands::Stage { base } => self.handle_stage(base.as_ref()),
            Commands::Upload { file, name } => {
                let name = name.clone().unwrap_or_else(|| file_name(file));
                self.expect_response(
                    Request::UploadFile {
                        file_path: file.clone(),
                        name: name.clone(),
                    },
                    "upload-finished",
                )?;
                Ok(format!("Uploaded {}", name))
            }
            Commands::Scan { path } => {
                let files = list_files_recursive(path)?;
                Ok(format_scan_text(path, &files))
            }
        }
    }

    fn handle_show(&self, format: &str) -> Result<String, ApiError> {
        if format != "text" && format != "json" {
            return Err(ApiError::InvalidRequest(format!(
                "Invalid format: {} (must be 'text' or 'json')",
                format
            )));
        }
        match self.expect_response(Request::GetTrackedFolder, "got-folder")? {
            Response::GotFolder(payload) if format == "json" => serde_json::to_string_pretty(&payload)
                .map_err(|e| ApiError::InvalidRequest(format!("Failed to render JSON: {}", e))),
            Response::GotFolder(payload) => Ok(format_folder_text(&payload)),
            other => Err(unexpected(&other)),
        }
    }

    fn handle_status(&self, file_id: &str, status: &str) -> Result<String, ApiError> {
        let status: FileStatus = status.parse().map_err(ApiError::InvalidRequest)?;
        let mut files = match self.app.tracked_folder()? {
            TrackedFolder::Untracked => {
                return Err(ApiError::InvalidRequest("No folder is tracked".to_string()))
            }
            TrackedFolder::Tracked { files, .. } => files,
        };
        // A rescan resets every status; carry over what earlier updates stored.
        let stored: HashMap<String, FileStatus> = self
            .app
            .folder_record()?
            .map(|record| record.files)
            .unwrap_or_default()
            .into_iter()
            .map(|f| (f.id, f.status))
            .collect();
        for file in files.iter_mut() {
            if let Some(previous) = stored.get(&file.id) {
                file.status = *previous;
            }
        }

        let file = files
            .iter_mut()
            .find(|f| f.id == file_id)
            .ok_or_else(|| {
                ApiError::InvalidRequest(format!("No tracked document with id {}", file_id))
            })?;
        file.status = status;
        let name = file.name.clone();

        self.expect_response(
            Request::UpdateFileStatus {
                id: LAST_FOLDER_ID.to_string(),
                files,
            },
            "folder-saved",
        )?;
        Ok(format!("Marked {} as {}", name, status))
    }

    fn handle_stage(&self, base: Option<&PathBuf>) -> Result<String, ApiError> {
        let (base_folder, files) = match base {
            Some(base) => {
                let base = absolute_path(base)?;
                let files = self.app.resolver().collect_documents(&base)?;
                (base, files)
            }
            None => {
                let tracked = self.app.tracked_folder()?;
                let Some(folder) = tracked.folder() else {
                    return Err(ApiError::InvalidRequest("No folder is tracked".to_string()));
                };
                let latest = resolve_latest_subfolder(folder)?.ok_or_else(|| {
                    ApiError::InvalidRequest(format!(
                        "{} has no document subfolder to stage",
                        folder.display()
                    ))
                })?;
                (latest, tracked.files().to_vec())
            }
        };

        let request = Request::StartStaging {
            base_folder,
            files: files.iter().map(StageFile::from).collect(),
        };
        let (response, notices) = self.dispatch(request);
        fail_on_error(&notices)?;
        match response {
            Some(Response::StagingDone) => Ok(render_notices(&notices)),
            Some(other) => Err(unexpected(&other)),
            None => Err(ApiError::OperationFailed("Staging did not complete".to_string())),
        }
    }

    fn dispatch(&self, request: Request) -> (Option<Response>, Vec<Notice>) {
        let response = self.runtime.block_on(self.app.handle(request));
        (response, self.notifier.drain())
    }

    /// Dispatch and require a response; error notices become errors.
    fn expect_response(&self, request: Request, expected: &str) -> Result<Response, ApiError> {
        let (response, notices) = self.dispatch(request);
        fail_on_error(&notices)?;
        response.ok_or_else(|| {
            ApiError::OperationFailed(format!("No {} response was produced", expected))
        })
    }
}

fn fail_on_error(notices: &[Notice]) -> Result<(), ApiError> {
    match notices.iter().find(|n| n.kind == NoticeKind::Error) {
        Some(notice) => Err(ApiError::OperationFailed(notice.message.clone())),
        None => Ok(()),
    }
}

fn render_notices(notices: &[Notice]) -> String {
    notices
        .iter()
        .map(format_notice)
        .collect::<Vec<_>>()
        .join("\n")
}

fn unexpected(response: &Response) -> ApiError {
    ApiError::OperationFailed(format!("Unexpected response {:?}", response))
}
