//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::StoreConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Validation(_) => None,
        }
    }
}

/// Parse a TOML document without validating it.
pub fn parse_config(content: &str) -> Result<StoreConfig, ConfigError> {
    toml::from_str(content).map_err(ConfigError::Parse)
}

/// Build the effective configuration.
///
/// Starts from the TOML file at `path` (or defaults when absent), applies the
/// port override, then validates the result.
pub fn load_config(path: Option<&Path>, port: Option<u16>) -> Result<StoreConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
            parse_config(&content)?
        }
        None => StoreConfig::default(),
    };

    if port.is_some() {
        config.listener.port = port;
    }

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
