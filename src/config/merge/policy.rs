//! Builder seeded with the defaults every layer overrides.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

/// Start a builder carrying the explicit scalar defaults.
///
/// Struct-level serde defaults fill in everything not listed here.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("store.development", false)?
        .set_default("staging.mode", "best_effort")?
        .set_default("logging.level", "info")?
        .set_default("logging.format", "text")
}
