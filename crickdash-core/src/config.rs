//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/crickdash/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/crickdash/` (~/.config/crickdash/)
//! - State/Logs: `$XDG_STATE_HOME/crickdash/` (~/.local/state/crickdash/)

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;

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

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Connect-form prefills
    #[serde(default)]
    pub connection: ConnectionConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Default values for the connect form.
///
/// These only prefill the form; nothing connects until the user asks.
/// Passwords are never read from config.
#[derive(Debug, Deserialize)]
pub struct ConnectionConfig {
    /// Database host
    #[serde(default = "default_host")]
    pub host: String,

    /// Database port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Database user
    #[serde(default = "default_user")]
    pub user: String,

    /// Database name
    #[serde(default = "default_database")]
    pub database: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            user: default_user(),
            database: default_database(),
        }
    }
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    3306
}

fn default_user() -> String {
    "root".to_string()
}

fn default_database() -> String {
    "crickets_db".to_string()
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
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/crickdash/config.toml` (~/.config/crickdash/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("crickdash").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/crickdash/` (~/.local/state/crickdash/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("crickdash")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/crickdash/crickdash.log` (~/.local/state/crickdash/crickdash.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("crickdash.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.connection.host, "localhost");
        assert_eq!(config.connection.port, 3306);
        assert_eq!(config.connection.user, "root");
        assert_eq!(config.connection.database, "crickets_db");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[connection]
host = "db.example.com"
port = 3307
user = "analytics"
database = "cricket"

[logging]
level = "debug"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.connection.host, "db.example.com");
        assert_eq!(config.connection.port, 3307);
        assert_eq!(config.connection.user, "analytics");
        assert_eq!(config.connection.database, "cricket");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let toml = r#"
[connection]
host = "10.0.0.5"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.connection.host, "10.0.0.5");
        assert_eq!(config.connection.port, 3306);
        assert_eq!(config.connection.user, "root");
    }

    #[test]
    fn test_load_from_missing_file() {
        let path = PathBuf::from("/nonexistent/crickdash/config.toml");
        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("configuration error"));
    }
}
