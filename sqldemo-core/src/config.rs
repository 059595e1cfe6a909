//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/sqldemo/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/sqldemo/` (~/.config/sqldemo/)
//! - Data: `$XDG_DATA_HOME/sqldemo/` (~/.local/share/sqldemo/)
//! - State/Logs: `$XDG_STATE_HOME/sqldemo/` (~/.local/state/sqldemo/)

use crate::db::StoreContext;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// File name of the working database, as created in `databases/`
pub const DATABASE_NAME: &str = "app_database";

/// Location of the bundled seed relative to the assets directory
pub const SEED_ASSET: &str = "database/Email.db";

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_DATA_HOME or ~/.local/share
fn xdg_data_home() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/share"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Seed and working database locations
    #[serde(default)]
    pub store: StoreConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Store path overrides
#[derive(Debug, Deserialize, Default, Clone)]
pub struct StoreConfig {
    /// Override path for the bundled seed database
    pub seed_path: Option<PathBuf>,
    /// Override path for the working database copy
    pub database_path: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Resolve where the seed is read from and where the working copy lives.
    pub fn store_context(&self) -> StoreContext {
        StoreContext::new(
            self.store
                .seed_path
                .clone()
                .unwrap_or_else(Self::default_seed_path),
            self.store
                .database_path
                .clone()
                .unwrap_or_else(Self::database_path),
        )
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/sqldemo/config.toml` (~/.config/sqldemo/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("sqldemo").join("config.toml")
    }

    /// Returns the data directory path
    ///
    /// `$XDG_DATA_HOME/sqldemo/` (~/.local/share/sqldemo/)
    pub fn data_dir() -> PathBuf {
        xdg_data_home().join("sqldemo")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/sqldemo/` (~/.local/state/sqldemo/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("sqldemo")
    }

    /// Returns the working database file path
    ///
    /// `$XDG_DATA_HOME/sqldemo/databases/app_database`
    pub fn database_path() -> PathBuf {
        Self::data_dir().join("databases").join(DATABASE_NAME)
    }

    /// Returns the bundled seed path
    ///
    /// `$XDG_DATA_HOME/sqldemo/assets/database/Email.db`
    pub fn default_seed_path() -> PathBuf {
        Self::data_dir().join("assets").join(SEED_ASSET)
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/sqldemo/sqldemo.log`
    pub fn log_path() -> PathBuf {
        Self::state_dir().join(crate::logging::LOG_FILE_NAME)
    }
}
