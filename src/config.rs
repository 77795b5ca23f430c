//! Configuration management for MovieMagic
//!
//! Handles config file loading/saving and API key resolution.
//! Config is stored at ~/.config/moviemagic/config.toml

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::api::tmdb::DEFAULT_BASE_URL;
use crate::models::Filter;
use crate::search::DEFAULT_QUIET_INTERVAL;

/// Environment variable that overrides the configured API key
pub const API_KEY_ENV: &str = "TMDB_API_KEY";

/// Application directory name under the platform config/data dirs
const APP_DIR: &str = "moviemagic";

/// Config error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No TMDB API key. Set {API_KEY_ENV} or tmdb_api_key in {0}")]
    MissingApiKey(String),

    #[error("Could not determine config path")]
    NoConfigDir,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Could not serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// TMDB v3 API key
    pub tmdb_api_key: Option<String>,
    /// API root override
    pub base_url: Option<String>,
    /// Per-request timeout in seconds
    pub request_timeout_secs: Option<u64>,
    /// Search quiet interval in milliseconds
    pub debounce_ms: Option<u64>,
    /// Directory holding favorites and the log file
    pub data_dir: Option<PathBuf>,
    /// Filter shown at startup
    pub default_filter: Option<Filter>,
}

impl Config {
    /// Get config file path (~/.config/moviemagic/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join(APP_DIR).join("config.toml"))
    }

    /// Load config from the default path, or return default if not found
    pub fn load() -> Self {
        match Self::path() {
            Some(path) => Self::load_from(&path).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "config ignored");
                Self::default()
            }),
            None => Self::default(),
        }
    }

    /// Load config from `path`; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(s) => Ok(toml::from_str(&s)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Save config to the default path
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml = toml::to_string_pretty(self)?;
        std::fs::write(path, toml)?;
        Ok(())
    }

    /// Resolve the TMDB API key:
    /// 1. Environment variable TMDB_API_KEY
    /// 2. Key from config file
    pub fn api_key(&self) -> Result<String, ConfigError> {
        let env = std::env::var(API_KEY_ENV).ok();
        self.api_key_with(env)
    }

    fn api_key_with(&self, env: Option<String>) -> Result<String, ConfigError> {
        env.into_iter()
            .chain(self.tmdb_api_key.clone())
            .map(|k| k.trim().to_string())
            .find(|k| !k.is_empty())
            .ok_or_else(|| {
                let path = Self::path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "config.toml".into());
                ConfigError::MissingApiKey(path)
            })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(crate::api::tmdb::DEFAULT_TIMEOUT)
    }

    pub fn quiet_interval(&self) -> Duration {
        self.debounce_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_QUIET_INTERVAL)
    }

    pub fn filter(&self) -> Filter {
        self.default_filter.unwrap_or_default()
    }

    /// Data directory (~/.local/share/moviemagic), falling back to the working dir
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|p| p.join(APP_DIR)))
            .unwrap_or_else(|| PathBuf::from(".").join(APP_DIR))
    }

    /// Log file used while the TUI owns the terminal
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("moviemagic.log")
    }
}
