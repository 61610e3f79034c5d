//! Cleaner configuration loading.

use std::fs;
use std::io;
use std::path::Path;

use crate::domain::AppError;
use crate::domain::configuration::CleanerConfig;

/// Load and validate the configuration.
///
/// Without a path every option takes its default.
pub fn load_config(path: Option<&Path>) -> Result<CleanerConfig, AppError> {
    let Some(path) = path else {
        let config = CleanerConfig::default();
        config.validate()?;
        return Ok(config);
    };

    let content = fs::read_to_string(path).map_err(|err| {
        if err.kind() == io::ErrorKind::NotFound {
            AppError::ConfigMissing(path.display().to_string())
        } else {
            AppError::Io(err)
        }
    })?;
    parse_config_content(&content)
}

/// Parse configuration from string content.
pub fn parse_config_content(content: &str) -> Result<CleanerConfig, AppError> {
    let config: CleanerConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}
