//! Configuration for the terminal gateway.
//!
//! Values come from an optional YAML file with environment overrides
//! (`MESA_*`), every field carrying a sensible default so the gateway runs
//! with no configuration at all against a local bridge.
//!
//! # Usage
//!
//! ```rust,ignore
//! use terminal_gateway::config::Config;
//!
//! // Defaults, file (when present) and environment, in that order.
//! let config = Config::load(Some("config.yaml"))?;
//! println!("listening on port {}", config.server.http_port);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::request::RequestStamp;
use crate::infrastructure::terminal::{BridgeConfig, RetryConfig};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse the YAML configuration.
    #[error("failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("config validation failed: {0}")]
    ValidationError(String),

    /// An environment override could not be parsed.
    #[error("invalid value in environment variable {name}: {message}")]
    InvalidEnvVar {
        /// Variable name.
        name: String,
        /// What went wrong.
        message: String,
    },
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Terminal bridge configuration.
    #[serde(default)]
    pub terminal: TerminalSettings,
    /// Trading request identification.
    #[serde(default)]
    pub trading: TradingSettings,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port for the REST endpoints.
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// Bind address.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: default_http_port(),
            bind_address: default_bind_address(),
        }
    }
}

const fn default_http_port() -> u16 {
    8080
}
fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

/// Terminal bridge connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerminalSettings {
    /// Base URL of the bridge REST API.
    #[serde(default = "default_bridge_url")]
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Retry policy for idempotent reads.
    #[serde(default)]
    pub retry: RetrySettings,
}

impl Default for TerminalSettings {
    fn default() -> Self {
        Self {
            base_url: default_bridge_url(),
            timeout_secs: default_timeout_secs(),
            retry: RetrySettings::default(),
        }
    }
}

fn default_bridge_url() -> String {
    "http://127.0.0.1:5001".to_string()
}
const fn default_timeout_secs() -> u64 {
    30
}

impl TerminalSettings {
    /// Build the bridge adapter configuration.
    #[must_use]
    pub fn bridge_config(&self) -> BridgeConfig {
        BridgeConfig::new(self.base_url.clone())
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_retry(self.retry.to_retry_config())
    }
}

/// Retry policy settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySettings {
    /// Maximum number of attempts.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Backoff before the first retry, in milliseconds.
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
    /// Backoff ceiling, in milliseconds.
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
    /// Multiplier applied after each retry.
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            multiplier: default_multiplier(),
        }
    }
}

const fn default_max_attempts() -> u32 {
    3
}
const fn default_initial_backoff_ms() -> u64 {
    250
}
const fn default_max_backoff_ms() -> u64 {
    5000
}
const fn default_multiplier() -> f64 {
    2.0
}

impl RetrySettings {
    /// Convert to the adapter's retry configuration.
    #[must_use]
    pub const fn to_retry_config(&self) -> RetryConfig {
        RetryConfig {
            max_attempts: self.max_attempts,
            initial_backoff: Duration::from_millis(self.initial_backoff_ms),
            max_backoff: Duration::from_millis(self.max_backoff_ms),
            multiplier: self.multiplier,
        }
    }
}

/// Trading request identification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingSettings {
    /// Expert id stamped on every request.
    #[serde(default = "default_magic")]
    pub magic: u64,
    /// Maximum accepted slippage for immediate deals, in ticks.
    #[serde(default = "default_deviation")]
    pub deviation: u32,
}

impl Default for TradingSettings {
    fn default() -> Self {
        Self {
            magic: default_magic(),
            deviation: default_deviation(),
        }
    }
}

const fn default_magic() -> u64 {
    1001
}
const fn default_deviation() -> u32 {
    20
}

impl TradingSettings {
    /// The request stamp for the order builder.
    #[must_use]
    pub const fn stamp(&self) -> RequestStamp {
        RequestStamp {
            magic: self.magic,
            deviation: self.deviation,
        }
    }
}

impl Config {
    /// Load configuration: defaults, then the YAML file when present, then
    /// environment overrides, then validation.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a YAML config file.
    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_string(),
            source,
        })?;
        Ok(serde_yaml_bw::from_str(&contents)?)
    }

    /// Apply `MESA_*` overrides from the given lookup.
    fn apply_overrides(
        &mut self,
        get: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(value) = get("MESA_HTTP_PORT") {
            self.server.http_port = parse_env("MESA_HTTP_PORT", &value)?;
        }
        if let Some(value) = get("MESA_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = get("MESA_BRIDGE_URL") {
            self.terminal.base_url = value;
        }
        if let Some(value) = get("MESA_BRIDGE_TIMEOUT_SECS") {
            self.terminal.timeout_secs = parse_env("MESA_BRIDGE_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = get("MESA_MAGIC") {
            self.trading.magic = parse_env("MESA_MAGIC", &value)?;
        }
        if let Some(value) = get("MESA_DEVIATION") {
            self.trading.deviation = parse_env("MESA_DEVIATION", &value)?;
        }
        Ok(())
    }

    /// Validate the assembled configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.http_port == 0 {
            return Err(ConfigError::ValidationError(
                "server.http_port must not be 0".to_string(),
            ));
        }
        if !self.terminal.base_url.starts_with("http") {
            return Err(ConfigError::ValidationError(format!(
                "terminal.base_url must be an http(s) URL, got '{}'",
                self.terminal.base_url
            )));
        }
        if self.terminal.retry.max_attempts == 0 {
            return Err(ConfigError::ValidationError(
                "terminal.retry.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.terminal.retry.multiplier < 1.0 {
            return Err(ConfigError::ValidationError(
                "terminal.retry.multiplier must be >= 1.0".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_env<V: std::str::FromStr>(name: &str, value: &str) -> Result<V, ConfigError>
where
    V::Err: std::fmt::Display,
{
    value.parse().map_err(|e: V::Err| ConfigError::InvalidEnvVar {
        name: name.to_string(),
        message: e.to_string(),
    })
}
