// ABOUTME: Loads TOML configuration for the registry command, root key, and logging.
// ABOUTME: Every field has a default; a missing config file means all defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::descriptor::STATUS_FLAG;
use crate::error::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Executable implementing add/delete/query.
    #[serde(default = "default_command")]
    pub command: String,
    #[serde(default = "default_root")]
    pub root: String,
    #[serde(default = "default_status_key")]
    pub status_key: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_command() -> String {
    "reg".to_string()
}

fn default_root() -> String {
    r"HKCU\Software\RegPrefs".to_string()
}

fn default_status_key() -> String {
    STATUS_FLAG.to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            root: default_root(),
            status_key: default_status_key(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl StoreConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Config {
    /// Load from `path`, or defaults if no file exists there.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::load_from_str(&contents)
    }

    fn load_from_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// `$REGPREFS_CONFIG`, else `$XDG_CONFIG_HOME/regprefs/config.toml`.
    pub fn config_file_path() -> PathBuf {
        if let Ok(override_path) = std::env::var("REGPREFS_CONFIG") {
            return PathBuf::from(override_path);
        }
        let xdg_config = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "~".to_string());
            format!("{home}/.config")
        });
        Path::new(&xdg_config).join("regprefs").join("config.toml")
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("Configuration saved to {}", path.display());
        Ok(())
    }
}
