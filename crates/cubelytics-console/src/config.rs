//! Configuration file loading.
//!
//! Lookup order for the file:
//! 1. `--config <path>`
//! 2. `$CUBELYTICS_CONFIG`
//! 3. `<config dir>/cubelytics/config.toml`
//!
//! An explicitly named file must exist; a missing default file means
//! built-in defaults. Command-line overrides are applied on top.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use cubelytics_protocol::{PROGRESS_LINGER_MS, SEARCH_PATH};

pub const CONFIG_ENV: &str = "CUBELYTICS_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub display: DisplayConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Scheme, host and port of the search backend.
    pub base_url: String,
    pub search_path: String,
    pub connect_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            search_path: SEARCH_PATH.to_string(),
            connect_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// How long the progress bar stays after a search completes.
    pub progress_linger_ms: u64,
    /// Whether result cards start expanded.
    pub expand_cards: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            progress_linger_ms: PROGRESS_LINGER_MS,
            expand_cards: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub filter: String,
    /// Log file for the interactive console.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
            file: None,
        }
    }
}

/// Where the configuration comes from, and whether it must exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLocation {
    pub path: PathBuf,
    pub required: bool,
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid configuration")
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load using the standard lookup order.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let location = locate(explicit, std::env::var_os(CONFIG_ENV), default_config_path());
        match location {
            Some(ConfigLocation { path, required }) if required || path.exists() => {
                let config = Self::load_from(&path)?;
                tracing::debug!(path = %path.display(), "Loaded configuration");
                Ok(config)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Apply command-line overrides.
    pub fn apply_overrides(&mut self, server: Option<String>, log_file: Option<PathBuf>) {
        if let Some(server) = server {
            self.server.base_url = server;
        }
        if let Some(file) = log_file {
            self.logging.file = Some(file);
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.server.connect_timeout_secs)
    }

    pub fn progress_linger(&self) -> Duration {
        Duration::from_millis(self.display.progress_linger_ms)
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("cubelytics").join("config.toml"))
}

/// Pick the config file from the flag, the environment value and the
/// platform default, in that order.
pub fn locate(
    explicit: Option<&Path>,
    env_value: Option<OsString>,
    default_path: Option<PathBuf>,
) -> Option<ConfigLocation> {
    if let Some(path) = explicit {
        return Some(ConfigLocation {
            path: path.to_path_buf(),
            required: true,
        });
    }
    if let Some(value) = env_value.filter(|v| !v.is_empty()) {
        return Some(ConfigLocation {
            path: PathBuf::from(value),
            required: true,
        });
    }
    default_path.map(|path| ConfigLocation { path, required: false })
}
