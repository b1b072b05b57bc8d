//! Configuration System
//!
//! Loads the service configuration from a TOML file. A missing or broken
//! config file is never fatal: the caller logs the problem and runs with
//! defaults.
//!
//! Boolean-ish keys (`no_sync`, `validate_tokens`, `self_monitor`) accept
//! TOML booleans as well as the strings `true`/`yes`/`on`/`1` for
//! compatibility with hand-written configs.

use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};

/// Default location of the config file, overridable with `-c`.
pub const DEFAULT_CONFIG_FILE: &str = "/etc/metricsearch.conf";

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub main: MainConfig,

    #[serde(default)]
    pub runtime: RuntimeConfig,
}

/// Service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MainConfig {
    /// Bind address; empty means all interfaces
    #[serde(default)]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_index_directory")]
    pub index_directory: String,

    /// Channel depth per shard writer; -1 disables durability
    #[serde(default = "default_sync_buffer_size")]
    pub sync_buffer_size: i64,

    /// Shorthand for `sync_buffer_size = -1`
    #[serde(default, deserialize_with = "boolish")]
    pub no_sync: bool,

    /// Log sink: empty for stderr, otherwise a file path
    #[serde(default)]
    pub log: String,

    /// trace / debug / info / notice / warning / error / critical
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_validate_tokens", deserialize_with = "boolish")]
    pub validate_tokens: bool,

    /// Emit RPS/counters to the local telemetry endpoint once per minute
    #[serde(default, deserialize_with = "boolish")]
    pub self_monitor: bool,

    /// Metric prefix for self-monitoring; defaults to the hostname with
    /// dots replaced by underscores
    #[serde(default)]
    pub self_monitor_prefix: String,
}

fn default_port() -> u16 {
    7000
}

fn default_index_directory() -> String {
    "/var/lib/metricsearch/index".to_string()
}

fn default_sync_buffer_size() -> i64 {
    1000
}

fn default_log_level() -> String {
    "debug".to_string()
}

fn default_validate_tokens() -> bool {
    true
}

impl Default for MainConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: default_port(),
            index_directory: default_index_directory(),
            sync_buffer_size: default_sync_buffer_size(),
            no_sync: false,
            log: String::new(),
            log_level: default_log_level(),
            validate_tokens: default_validate_tokens(),
            self_monitor: false,
            self_monitor_prefix: String::new(),
        }
    }
}

/// Runtime sizing hints
#[derive(Debug, Clone, Deserialize)]
pub struct RuntimeConfig {
    /// Tokio worker threads
    #[serde(default = "default_max_cores")]
    pub max_cores: usize,

    /// Cap on blocking threads (bulk dump/load workers)
    #[serde(default = "default_max_threads")]
    pub max_threads: usize,
}

fn default_max_cores() -> usize {
    8
}

fn default_max_threads() -> usize {
    10000
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_cores: default_max_cores(),
            max_threads: default_max_threads(),
        }
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let mut config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        if config.main.no_sync {
            config.main.sync_buffer_size = -1;
        }

        Ok(config)
    }

    /// Load configuration, falling back to defaults on any error.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("{e}; using configuration defaults");
                Config::default()
            }
        }
    }

    /// The socket address string to bind the HTTP server to.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.main.host, self.main.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            main: MainConfig::default(),
            runtime: RuntimeConfig::default(),
        }
    }
}

/// Accept TOML booleans plus the strings `true`/`yes`/`on`/`1` (and the
/// bare integer `1`); anything else is false.
fn boolish<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolIsh {
        Bool(bool),
        Int(i64),
        Str(String),
    }

    Ok(match BoolIsh::deserialize(deserializer)? {
        BoolIsh::Bool(b) => b,
        BoolIsh::Int(n) => n == 1,
        BoolIsh::Str(s) => matches!(
            s.to_ascii_lowercase().as_str(),
            "true" | "yes" | "on" | "1"
        ),
    })
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}
