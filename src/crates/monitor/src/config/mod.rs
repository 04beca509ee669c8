//! Server configuration for monitor-server
//!
//! Loads and parses monitor-server.toml with server, database, monitor
//! channel, and credential settings. Every section has defaults so the
//! server also runs without a config file.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(toml::de::Error),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Server identification and bind address
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfoConfig {
    /// Server name for identification (displayed to clients)
    #[serde(default = "default_server_name")]
    pub name: String,
    /// Bind host (HOST env var overrides)
    #[serde(default = "default_host")]
    pub host: String,
    /// Bind port (PORT env var overrides)
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerInfoConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_server_name() -> String {
    "monitor-server".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database file path
    #[serde(default = "default_database_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    "login_attempts.db".to_string()
}

/// Monitor channel tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Seconds a viewer may stay silent before a keepalive is sent
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
    /// Attempts included in the init snapshot
    #[serde(default = "default_init_recent_limit")]
    pub init_recent_limit: i64,
    /// Outbound queue depth per viewer; a viewer that falls this far behind
    /// is dropped rather than allowed to stall broadcasts
    #[serde(default = "default_outbound_queue")]
    pub outbound_queue: usize,
    /// Failed attempts from one IP within the window that trigger a block
    #[serde(default = "default_failed_threshold")]
    pub failed_threshold: i64,
    /// Trailing window for the failure count, in minutes
    #[serde(default = "default_failed_window_minutes")]
    pub failed_window_minutes: i64,
    /// Temporary block duration, in minutes
    #[serde(default = "default_block_minutes")]
    pub block_minutes: i64,
    /// Optional global stats push interval, in seconds. Unset means viewers
    /// pull stats on demand and rely on the idle keepalive.
    #[serde(default)]
    pub stats_interval_secs: Option<u64>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: default_idle_timeout_secs(),
            init_recent_limit: default_init_recent_limit(),
            outbound_queue: default_outbound_queue(),
            failed_threshold: default_failed_threshold(),
            failed_window_minutes: default_failed_window_minutes(),
            block_minutes: default_block_minutes(),
            stats_interval_secs: None,
        }
    }
}

impl MonitorConfig {
    /// Idle timeout as a Duration
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}

fn default_idle_timeout_secs() -> u64 {
    60
}

fn default_init_recent_limit() -> i64 {
    20
}

fn default_outbound_queue() -> usize {
    64
}

fn default_failed_threshold() -> i64 {
    5
}

fn default_failed_window_minutes() -> i64 {
    15
}

fn default_block_minutes() -> i64 {
    30
}

/// Credential table configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// username -> plaintext password; hashed at load time. Empty means the
    /// demo credential set.
    #[serde(default)]
    pub users: HashMap<String, String>,
}

/// Complete server configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server identification and bind address
    #[serde(default)]
    pub server: ServerInfoConfig,
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Monitor channel tuning
    #[serde(default)]
    pub monitor: MonitorConfig,
    /// Credential table
    #[serde(default)]
    pub auth: AuthConfig,
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ServerConfigError> {
        let content =
            std::fs::read_to_string(path.as_ref()).map_err(ServerConfigError::ReadError)?;
        Self::from_toml(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ServerConfigError> {
        toml::from_str(content).map_err(ServerConfigError::ParseError)
    }

    /// Load configuration from default location or environment
    ///
    /// Searches for config in:
    /// 1. CONFIG_PATH environment variable
    /// 2. ./config/monitor-server.toml
    /// 3. ./monitor-server.toml
    pub fn load() -> Result<Self, ServerConfigError> {
        if let Ok(config_path) = std::env::var("CONFIG_PATH") {
            return Self::from_file(config_path);
        }

        let paths = [
            PathBuf::from("config/monitor-server.toml"),
            PathBuf::from("./monitor-server.toml"),
        ];

        for path in &paths {
            if path.exists() {
                return Self::from_file(path);
            }
        }

        Err(ServerConfigError::InvalidConfig(
            "Configuration file not found. Set CONFIG_PATH or place monitor-server.toml in config/"
                .to_string(),
        ))
    }

    /// Get database URL from configuration
    pub fn database_url(&self) -> String {
        format!("sqlite://{}", self.database.path)
    }

    /// Bind host, with HOST env override
    pub fn host(&self) -> String {
        std::env::var("HOST").unwrap_or_else(|_| self.server.host.clone())
    }

    /// Bind port, with PORT env override
    pub fn port(&self) -> u16 {
        std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_parsing() {
        let toml_content = r#"
[server]
name = "monitor-server"
host = "0.0.0.0"
port = 8000

[database]
path = "login_attempts.db"

[monitor]
idle_timeout_secs = 60
init_recent_limit = 20
outbound_queue = 64
failed_threshold = 5
failed_window_minutes = 15
block_minutes = 30

[auth.users]
ilya = "1111"
"#;

        let config = ServerConfig::from_toml(toml_content).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.database.path, "login_attempts.db");
        assert_eq!(config.monitor.idle_timeout_secs, 60);
        assert_eq!(config.auth.users.get("ilya"), Some(&"1111".to_string()));
    }

    #[test]
    fn test_defaults_from_empty_toml() {
        let config = ServerConfig::from_toml("").unwrap();
        assert_eq!(config.server.name, "monitor-server");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.database.path, "login_attempts.db");
        assert_eq!(config.monitor.idle_timeout_secs, 60);
        assert_eq!(config.monitor.init_recent_limit, 20);
        assert!(config.monitor.stats_interval_secs.is_none());
        assert!(config.auth.users.is_empty());
    }

    #[test]
    fn test_database_url() {
        let config = ServerConfig::default();
        assert_eq!(config.database_url(), "sqlite://login_attempts.db");
    }
}
