//! # Zonegate Configuration
//!
//! Serde-backed settings for the record validation engine and its command
//! line front end. Files may be YAML, JSON or TOML; the format is chosen by
//! extension, with YAML as the fallback.
//!
//! The engine only ever borrows a [`DnsConfig`]; it never mutates it.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod hostname;

pub use hostname::HostnamePolicy;

/// Configuration error.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("File not found: {0}")]
    NotFound(PathBuf),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Default TTL applied when a record leaves its TTL blank.
pub const DEFAULT_TTL: u32 = 86400;

/// Default bound on record content length, checked before any tokenizing.
pub const DEFAULT_MAX_CONTENT_LENGTH: usize = 65535;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Record validation settings.
    pub dns: DnsConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl Config {
    /// Loads configuration from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;

        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            _ => serde_yaml::from_str(&content)?,
        };

        Ok(config)
    }

    /// Loads configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        self.dns.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Serializes to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Record validation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DnsConfig {
    /// Hostname acceptance policy.
    pub hostname: HostnamePolicy,

    /// TTL used when a record's TTL is blank and the caller supplies none.
    pub default_ttl: u32,

    /// Longest record content accepted, in bytes.
    pub max_content_length: usize,
}

impl Default for DnsConfig {
    fn default() -> Self {
        Self {
            hostname: HostnamePolicy::default(),
            default_ttl: DEFAULT_TTL,
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
        }
    }
}

impl DnsConfig {
    fn validate(&self) -> Result<()> {
        self.hostname.validate()?;

        if self.max_content_length == 0 {
            return Err(ConfigError::InvalidValue {
                field: "dns.max_content_length".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level.
    pub level: String,

    /// Log format (text, json).
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "text".to_string(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<()> {
        const LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "warning", "error"];

        if !LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                message: format!("unknown level '{}'", self.level),
            });
        }

        if !matches!(self.format.as_str(), "text" | "json") {
            return Err(ConfigError::InvalidValue {
                field: "logging.format".to_string(),
                message: "must be 'text' or 'json'".to_string(),
            });
        }

        Ok(())
    }
}
