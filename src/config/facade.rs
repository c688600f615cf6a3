//! ConfigLoader facade delegating to the merge service.

use super::merge::service::MergeService;
use super::TrackerConfig;
use config::ConfigError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the global file and environment.
    pub fn load() -> Result<TrackerConfig, ConfigError> {
        MergeService::load(None)
    }

    /// Load configuration with `path` layered over the global file.
    pub fn load_from_file(path: &Path) -> Result<TrackerConfig, ConfigError> {
        MergeService::load(Some(path))
    }
}
