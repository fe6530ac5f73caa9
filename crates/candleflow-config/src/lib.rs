//! Configuration management.
//!
//! Settings are layered: built-in defaults, then an optional TOML file,
//! then `CANDLEFLOW_`-prefixed environment variables.

mod settings;

pub use settings::{
    AppConfig, AppSettings, EngineSettings, ExecutorSettings, FeedSettings, LoggingConfig,
    ModelSettings,
};

use config::{Config, Environment, File};
use std::path::Path;

use candleflow_core::ConfigError;

/// Load configuration from file and environment.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(
            Environment::with_prefix("CANDLEFLOW")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let settings: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;
    settings.validate()?;
    Ok(settings)
}

/// Load configuration from environment and defaults only.
pub fn load_default_config() -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(
            Environment::with_prefix("CANDLEFLOW")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let settings: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;
    settings.validate()?;
    Ok(settings)
}
