//! Runtime configuration, read from the environment (and a `.env` file if present).

use std::{env, path::PathBuf, str::FromStr};

use dotenv::dotenv;
use log::LevelFilter;
use thiserror::Error;

use crate::consts::{DEFAULT_LOG_FILE, DEFAULT_LOG_LEVEL, LOG_FILE_VAR, LOG_LEVEL_VAR};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid log level '{0}' (expected off, error, warn, info, debug or trace)")]
    InvalidLogLevel(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub log_file: PathBuf,
    pub log_level: LevelFilter,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            log_level: LevelFilter::Info,
        }
    }
}

impl Config {
    /// Loads the configuration from `.env` and the process environment
    pub fn load() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_values(env::var(LOG_FILE_VAR).ok(), env::var(LOG_LEVEL_VAR).ok())
    }

    /// Builds a configuration from optional raw values, falling back to the defaults
    pub fn from_values(
        log_file: Option<String>,
        log_level: Option<String>,
    ) -> Result<Self, ConfigError> {
        let log_file = log_file
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));

        let level = log_level.unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_owned());
        let log_level = LevelFilter::from_str(level.trim())
            .map_err(|_| ConfigError::InvalidLogLevel(level.clone()))?;

        Ok(Self {
            log_file,
            log_level,
        })
    }
}
