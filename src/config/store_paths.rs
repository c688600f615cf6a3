//! StoreConfig and store location resolution.

use crate::config::xdg;
use crate::error::ApiError;
use serde::Deserialize;
use std::path::PathBuf;

/// Store location used in development mode, relative to the working directory.
pub const DEVELOPMENT_STORE_PATH: &str = "uploadtracker.db";

/// Store configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Explicit store location; wins over everything else.
    pub path: Option<PathBuf>,

    /// Keep the store next to the working directory instead of the user data dir.
    pub development: bool,
}

impl StoreConfig {
    /// Resolve the store location: explicit path, development path, then
    /// `$XDG_DATA_HOME/uploadtracker/database`.
    pub fn resolve_path(&self) -> Result<PathBuf, ApiError> {
        if let Some(path) = &self.path {
            if !path.as_os_str().is_empty() {
                return Ok(path.clone());
            }
        }
        if self.development {
            return Ok(PathBuf::from(DEVELOPMENT_STORE_PATH));
        }
        Ok(xdg::app_data_dir()?.join("database"))
    }
}
