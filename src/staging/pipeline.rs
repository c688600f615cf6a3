//! Staging pipeline
//!
//! Rebuilds `<parent>/SOURCE/{NATIVE,PDF}` from scratch and copies the selected
//! documents into `NATIVE`. A run moves through
//! `Idle -> ClearingOutput -> CreatingTree -> Copying -> Done | Failed` and never
//! retries; calling `stage` again starts over from `ClearingOutput`.
//!
//! In best-effort mode (the default) copies that succeeded stay in `NATIVE` even
//! when another copy fails. Atomic mode stages into a scratch tree and only
//! replaces `SOURCE` once every copy succeeded.

use crate::error::{CopyFailure, StagingError};
use crate::staging::layout::StagingLayout;
use crate::types::FileDescriptor;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// How a staging run treats partially copied output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StagingMode {
    /// Copy straight into `SOURCE/NATIVE`; successful copies survive a failed run.
    #[default]
    BestEffort,
    /// Copy into a scratch tree and swap it in only when every copy succeeded.
    Atomic,
}

/// Phase of a single staging run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StagingPhase {
    Idle,
    ClearingOutput,
    CreatingTree,
    Copying,
    Done,
    Failed,
}

/// A file to copy into `NATIVE`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageFile {
    #[serde(rename = "filePath", alias = "path")]
    pub path: PathBuf,
    /// Name used for the copy; only its final component is used.
    pub name: String,
}

impl From<&FileDescriptor> for StageFile {
    fn from(descriptor: &FileDescriptor) -> Self {
        Self {
            path: descriptor.path.clone(),
            name: descriptor.name.clone(),
        }
    }
}

/// Outcome of a successful staging run.
#[derive(Debug, Clone)]
pub struct StagingReport {
    pub layout: StagingLayout,
    /// Copied files, in request order.
    pub copied: Vec<PathBuf>,
}

impl StagingReport {
    /// Human-readable confirmation pointing at `NATIVE`.
    pub fn confirmation(&self) -> String {
        format!(
            "Your recent documents have been copied to {}.",
            self.layout.native.display()
        )
    }
}

pub struct StagingPipeline {
    mode: StagingMode,
}

impl StagingPipeline {
    pub fn new(mode: StagingMode) -> Self {
        Self { mode }
    }

    /// Stage `files` next to `base_folder`.
    pub async fn stage(
        &self,
        base_folder: &Path,
        files: &[StageFile],
    ) -> Result<StagingReport, StagingError> {
        self.stage_observed(base_folder, files, &mut |_| {}).await
    }

    /// Same as [`stage`](Self::stage), reporting every phase change to `observer`.
    pub async fn stage_observed(
        &self,
        base_folder: &Path,
        files: &[StageFile],
        observer: &mut (dyn FnMut(StagingPhase) + Send),
    ) -> Result<StagingReport, StagingError> {
        let layout = StagingLayout::for_base_folder(base_folder);
        let mut run = PhaseTracker::new(&layout.source, observer);
        info!(
            base_folder = %base_folder.display(),
            source = %layout.source.display(),
            files = files.len(),
            mode = ?self.mode,
            "Starting staging run"
        );

        let result = match self.mode {
            StagingMode::BestEffort => stage_in_place(&layout, files, &mut run).await,
            StagingMode::Atomic => stage_atomic(&layout, files, &mut run).await,
        };

        match &result {
            Ok(report) => {
                run.enter(StagingPhase::Done);
                info!(
                    native = %report.layout.native.display(),
                    copied = report.copied.len(),
                    "Staging run finished"
                );
            }
            Err(err) => {
                run.enter(StagingPhase::Failed);
                error!(source = %layout.source.display(), error = %err, "Staging run failed");
            }
        }
        result
    }
}

impl Default for StagingPipeline {
    fn default() -> Self {
        Self::new(StagingMode::default())
    }
}

struct PhaseTracker<'a, 'o> {
    phase: StagingPhase,
    source: &'a Path,
    observer: &'a mut (dyn FnMut(StagingPhase) + Send + 'o),
}

impl<'a, 'o> PhaseTracker<'a, 'o> {
    fn new(source: &'a Path, observer: &'a mut (dyn FnMut(StagingPhase) + Send + 'o)) -> Self {
        observer(StagingPhase::Idle);
        Self {
            phase: StagingPhase::Idle,
            source,
            observer,
        }
    }

    fn enter(&mut self, next: StagingPhase) {
        debug!(
            source = %self.source.display(),
            from = ?self.phase,
            to = ?next,
            "Staging phase transition"
        );
        self.phase = next;
        (self.observer)(next);
    }
}

async fn stage_in_place(
    layout: &StagingLayout,
    files: &[StageFile],
    run: &mut PhaseTracker<'_, '_>,
) -> Result<StagingReport, StagingError> {
    run.enter(StagingPhase::ClearingOutput);
    clear_output(&layout.source).await?;

    run.enter(StagingPhase::CreatingTree);
    create_tree(layout).await?;

    run.enter(StagingPhase::Copying);
    let copied = copy_all(&layout.native, files).await?;

    Ok(StagingReport {
        layout: layout.clone(),
        copied,
    })
}

async fn stage_atomic(
    layout: &StagingLayout,
    files: &[StageFile],
    run: &mut PhaseTracker<'_, '_>,
) -> Result<StagingReport, StagingError> {
    let scratch = layout.partial();

    run.enter(StagingPhase::ClearingOutput);
    clear_output(&scratch.source).await?;

    run.enter(StagingPhase::CreatingTree);
    create_tree(&scratch).await?;

    run.enter(StagingPhase::Copying);
    let copied = match copy_all(&scratch.native, files).await {
        Ok(copied) => copied,
        Err(err) => {
            if let Err(cleanup) = tokio::fs::remove_dir_all(&scratch.source).await {
                warn!(
                    path = %scratch.source.display(),
                    error = %cleanup,
                    "Failed to remove scratch staging tree"
                );
            }
            return Err(err);
        }
    };

    clear_output(&layout.source).await?;
    tokio::fs::rename(&scratch.source, &layout.source)
        .await
        .map_err(|source| StagingError::Publish {
            from: scratch.source.clone(),
            to: layout.source.clone(),
            source,
        })?;

    let copied = copied
        .iter()
        .filter_map(|p| p.file_name())
        .map(|name| layout.native.join(name))
        .collect();
    Ok(StagingReport {
        layout: layout.clone(),
        copied,
    })
}

/// Remove `path` and everything below it; a missing path is not an error.
async fn clear_output(path: &Path) -> Result<(), StagingError> {
    match tokio::fs::symlink_metadata(path).await {
        Ok(_) => {
            debug!(path = %path.display(), "Removing previous staging output");
            tokio::fs::remove_dir_all(path)
                .await
                .map_err(|source| StagingError::Clear {
                    path: path.to_path_buf(),
                    source,
                })
        }
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(source) => Err(StagingError::Clear {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Create `SOURCE`, `NATIVE` and `PDF`, in that order.
async fn create_tree(layout: &StagingLayout) -> Result<(), StagingError> {
    for dir in [&layout.source, &layout.native, &layout.pdf] {
        tokio::fs::create_dir(dir)
            .await
            .map_err(|source| StagingError::CreateDir {
                path: dir.clone(),
                source,
            })?;
    }
    Ok(())
}

/// Copy every file into `native` concurrently and wait for all of them.
async fn copy_all(native: &Path, files: &[StageFile]) -> Result<Vec<PathBuf>, StagingError> {
    let copies = files.iter().map(|file| async move {
        let outcome = match copy_target(native, file) {
            Ok(target) => {
                let result = tokio::fs::copy(&file.path, &target).await;
                (target, result)
            }
            Err(err) => (native.join(&file.name), Err(err)),
        };
        (file, outcome)
    });

    let mut copied = Vec::with_capacity(files.len());
    let mut failures = Vec::new();
    for (file, (target, result)) in join_all(copies).await {
        match result {
            Ok(bytes) => {
                debug!(
                    from = %file.path.display(),
                    to = %target.display(),
                    bytes,
                    "Copied document"
                );
                copied.push(target);
            }
            Err(error) => {
                warn!(
                    from = %file.path.display(),
                    to = %target.display(),
                    error = %error,
                    "Failed to copy document"
                );
                failures.push(CopyFailure {
                    source: file.path.clone(),
                    target,
                    error,
                });
            }
        }
    }

    if failures.is_empty() {
        Ok(copied)
    } else {
        Err(StagingError::Copy {
            native: native.to_path_buf(),
            failed: failures.len(),
            total: files.len(),
            failures,
        })
    }
}

fn copy_target(native: &Path, file: &StageFile) -> std::io::Result<PathBuf> {
    let name = Path::new(&file.name)
        .file_name()
        .or_else(|| file.path.file_name())
        .ok_or_else(|| {
            std::io::Error::new(
                ErrorKind::InvalidInput,
                format!("No file name for {}", file.path.display()),
            )
        })?;
    Ok(native.join(name))
}
