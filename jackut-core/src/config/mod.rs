//! Configuration management for Jackut
//!
//! Defaults can be overridden from a TOML file or from environment variables.

use crate::core_social::{PasswordPolicy, SnapshotFormat, SnapshotStore};
use crate::logging::{LogConfig, LogLevel};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

mod error;

pub use error::ConfigError;

/// Default snapshot file name, relative to the working directory
pub const DEFAULT_DATA_FILE: &str = "dados.ser";

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub logging: LoggingConfig,
    /// Argon2 costs for newly registered passwords
    pub security: PasswordPolicy,
}

/// Snapshot persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Snapshot file, loaded on open and written on shutdown
    pub data_file: PathBuf,

    pub format: SnapshotFormat,

    /// Write the snapshot when the facade shuts down
    pub save_on_shutdown: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,

    /// Enable JSON formatting
    pub json_format: bool,

    /// Include target module
    pub with_target: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            format: SnapshotFormat::Bincode,
            save_on_shutdown: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            json_format: false,
            with_target: true,
        }
    }
}

impl StoreConfig {
    pub fn snapshot_store(&self) -> SnapshotStore {
        SnapshotStore::new(self.data_file.clone(), self.format)
    }
}

impl LoggingConfig {
    pub fn to_log_config(&self) -> LogConfig {
        LogConfig::new(self.level)
            .with_target(self.with_target)
            .json_format(self.json_format)
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Recognized variables: `JACKUT_DATA_FILE`, `JACKUT_SNAPSHOT_FORMAT`,
    /// `JACKUT_SAVE_ON_SHUTDOWN`, `JACKUT_LOG_LEVEL`, `JACKUT_LOG_JSON`,
    /// `JACKUT_PASSWORD_MEMORY_KIB`, `JACKUT_PASSWORD_ITERATIONS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Config::from_env`], reading variables through `lookup`
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        // Store config
        if let Some(data_file) = lookup("JACKUT_DATA_FILE") {
            config.store.data_file = PathBuf::from(data_file);
        }
        if let Some(format) = lookup("JACKUT_SNAPSHOT_FORMAT") {
            config.store.format = format.parse().map_err(ConfigError::InvalidValue)?;
        }
        if let Some(save) = lookup("JACKUT_SAVE_ON_SHUTDOWN") {
            config.store.save_on_shutdown = save.parse().map_err(|e| {
                ConfigError::InvalidValue(format!("Invalid save-on-shutdown flag: {}", e))
            })?;
        }

        // Logging config
        if let Some(level) = lookup("JACKUT_LOG_LEVEL") {
            config.logging.level = level
                .parse()
                .map_err(|e| ConfigError::InvalidValue(format!("Invalid log level: {}", e)))?;
        }
        if let Some(json) = lookup("JACKUT_LOG_JSON") {
            config.logging.json_format = json
                .parse()
                .map_err(|e| ConfigError::InvalidValue(format!("Invalid JSON flag: {}", e)))?;
        }

        // Security config
        if let Some(memory) = lookup("JACKUT_PASSWORD_MEMORY_KIB") {
            config.security.memory_kib = memory.parse().map_err(|e| {
                ConfigError::InvalidValue(format!("Invalid password memory cost: {}", e))
            })?;
        }
        if let Some(iterations) = lookup("JACKUT_PASSWORD_ITERATIONS") {
            config.security.iterations = iterations.parse().map_err(|e| {
                ConfigError::InvalidValue(format!("Invalid password iterations: {}", e))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead(e.to_string()))?;

        let config: Self =
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.data_file.file_name().is_none() {
            return Err(ConfigError::ValidationFailed(format!(
                "data_file must name a file: '{}'",
                self.store.data_file.display()
            )));
        }

        self.security
            .validate()
            .map_err(|e| ConfigError::ValidationFailed(e.to_string()))?;

        Ok(())
    }

    /// Save configuration to file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;

        std::fs::write(path, contents).map_err(|e| ConfigError::FileWrite(e.to_string()))?;

        Ok(())
    }
}
