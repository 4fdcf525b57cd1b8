//! Application configuration module
//!
//! This module centralizes the history and compare settings using `confy`
//! for automatic serialization and OS-specific config directory management.

use crate::constant::{
    APP_NAME, APP_ORGANIZATION, APP_QUALIFIER, AUTOSAVE_COOLDOWN_SECS, DEFAULT_STORE_NAMESPACE,
    MAX_VERSIONS, STORE_DIR,
};
use crate::history::DiffOptions;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Confy(#[from] confy::ConfyError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct Config {
    pub settings: Settings,
}

impl Config {
    /// Load configuration from disk, creating default if it doesn't exist
    pub fn load() -> Result<Self, ConfigError> {
        let settings: Settings = confy::load(APP_NAME, None)?;
        info!("Load config from {:?}", Self::config_path()?);
        Ok(Self { settings })
    }

    /// Save current configuration to disk
    pub fn save(&self) -> Result<(), ConfigError> {
        confy::store(APP_NAME, None, &self.settings)?;
        info!("Save config to {:?}", Self::config_path()?);
        Ok(())
    }

    /// Get the application data directory
    /// Falls back to a local "data" directory if platform dirs are unavailable
    pub fn data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.settings.data_dir {
            return dir.clone();
        }
        if let Some(proj_dirs) = ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME) {
            proj_dirs.data_dir().to_path_buf()
        } else {
            PathBuf::from("data")
        }
    }

    /// Directory the file-backed key-value store writes into
    pub fn store_dir(&self) -> PathBuf {
        self.data_dir().join(STORE_DIR)
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(confy::get_configuration_file_path(APP_NAME, None)?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("Falling back to default settings: {}", e);
            Self {
                settings: Settings::default(),
            }
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Maximum number of versions kept in history
    pub history_limit: usize,

    /// Minimum seconds between two autosaves
    pub autosave_cooldown_secs: u64,

    /// Compare lines with whitespace runs collapsed
    pub ignore_whitespace: bool,

    /// Hide unchanged files in the rendered diff
    pub only_changed: bool,

    /// Prefix for every key written to the store
    pub store_namespace: String,

    /// Overrides the platform data directory
    pub data_dir: Option<PathBuf>,
}

impl Settings {
    pub fn autosave_cooldown(&self) -> Duration {
        Duration::from_secs(self.autosave_cooldown_secs)
    }

    pub fn diff_options(&self) -> DiffOptions {
        DiffOptions {
            ignore_whitespace: self.ignore_whitespace,
            only_changed: self.only_changed,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            history_limit: MAX_VERSIONS,
            autosave_cooldown_secs: AUTOSAVE_COOLDOWN_SECS,
            ignore_whitespace: false,
            only_changed: false,
            store_namespace: DEFAULT_STORE_NAMESPACE.to_string(),
            data_dir: None,
        }
    }
}
