//! Environment variable source: UPLOADTRACKER prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "UPLOADTRACKER";

/// Add environment variable overlay to builder.
///
/// `UPLOADTRACKER__STAGING__MODE=atomic` sets `staging.mode`; lists such as
/// `documents.extensions` are comma separated.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("documents.extensions"),
    );
    Ok(builder)
}
