//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ServiceConfig;
use crate::config::validation::{validate_config, InvalidSetting};

/// Environment variable naming the TOML configuration file.
pub const CONFIG_PATH_ENV: &str = "PROJECT_CONFIG";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<InvalidSetting>),
}

fn join(errors: &[InvalidSetting]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: ServiceConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Resolve the effective configuration: the file named by `PROJECT_CONFIG`
/// (or defaults), then environment overrides, then validation.
pub fn load_from_env() -> Result<ServiceConfig, ConfigError> {
    let config = match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) => load_config(Path::new(&path))?,
        Err(_) => ServiceConfig::default(),
    }
    .with_env_overrides();

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}
