//! Staging: rebuild the `SOURCE/NATIVE` + `SOURCE/PDF` tree and copy documents into it.

pub mod layout;
pub mod pipeline;

pub use layout::{is_reserved_dir_name, StagingLayout, RESERVED_DIR_NAMES};
pub use pipeline::{StageFile, StagingMode, StagingPhase, StagingPipeline, StagingReport};
