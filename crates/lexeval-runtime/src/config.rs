//! Runtime configuration.
//!
//! Loaded from a YAML or JSON file (by extension), then overridden by
//! `LEXEVAL_*` environment variables. Durations are written human-readable:
//! `"250ms"`, `"10s"`, `"1h"`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors from configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid value for {key}: {message}")]
    InvalidOverride { key: &'static str, message: String },

    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

mod humantime_duration {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&humantime::format_duration(*duration).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        humantime::parse_duration(&raw).map_err(serde::de::Error::custom)
    }
}

/// Retry policy for provider calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts including the first one
    pub max_attempts: u32,

    /// Time allowed for each attempt
    #[serde(with = "humantime_duration")]
    pub attempt_timeout: Duration,

    /// Delay before the first retry
    #[serde(with = "humantime_duration")]
    pub min_delay: Duration,

    /// Upper bound for any single delay
    #[serde(with = "humantime_duration")]
    pub max_delay: Duration,

    /// Growth factor between consecutive delays
    pub factor: f32,

    /// Randomize delays to spread concurrent retries
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            attempt_timeout: Duration::from_secs(10),
            min_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
            factor: 2.0,
            jitter: true,
        }
    }
}

impl RetryConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::ValidationError(
                "retry.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.attempt_timeout.is_zero() {
            return Err(ConfigError::ValidationError(
                "retry.attempt_timeout must be greater than zero".to_string(),
            ));
        }
        if self.factor.is_nan() || self.factor < 1.0 {
            return Err(ConfigError::ValidationError(
                "retry.factor must be at least 1.0".to_string(),
            ));
        }
        if self.min_delay > self.max_delay {
            return Err(ConfigError::ValidationError(
                "retry.min_delay must not exceed retry.max_delay".to_string(),
            ));
        }
        Ok(())
    }
}

/// Which scoring provider to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// No provider; every evaluation is degraded
    #[default]
    None,
    Anthropic,
}

/// Scoring provider settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub kind: ProviderKind,

    pub model: String,

    /// Custom API endpoint
    pub base_url: Option<String>,

    /// Environment variable holding the API key
    pub api_key_env: String,

    pub max_tokens: u32,

    pub temperature: f32,

    /// Transport-level timeout for one HTTP request
    #[serde(with = "humantime_duration")]
    pub request_timeout: Duration,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            kind: ProviderKind::None,
            model: "claude-sonnet-4-5-20250514".to_string(),
            base_url: None,
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            max_tokens: 400,
            temperature: 0.0,
            request_timeout: Duration::from_secs(15),
        }
    }
}

/// Request-level result cache settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,

    pub max_entries: u64,

    #[serde(with = "humantime_duration")]
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_entries: 10_000,
            ttl: Duration::from_secs(3600),
        }
    }
}

/// Top-level runtime configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub retry: RetryConfig,
    pub provider: ProviderSettings,
    pub cache: CacheConfig,
}

impl RuntimeConfig {
    const ENV_MAX_ATTEMPTS: &'static str = "LEXEVAL_MAX_ATTEMPTS";
    const ENV_ATTEMPT_TIMEOUT: &'static str = "LEXEVAL_ATTEMPT_TIMEOUT";
    const ENV_MODEL: &'static str = "LEXEVAL_MODEL";

    /// Parse configuration from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.yaml`, `.yml` or `.json` file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            Some("json") => Self::from_json(&content),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }

    /// Apply `LEXEVAL_*` overrides from the process environment.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`, then validate.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(raw) = lookup(Self::ENV_MAX_ATTEMPTS) {
            self.retry.max_attempts =
                raw.trim()
                    .parse()
                    .map_err(|e: std::num::ParseIntError| ConfigError::InvalidOverride {
                        key: Self::ENV_MAX_ATTEMPTS,
                        message: e.to_string(),
                    })?;
        }

        if let Some(raw) = lookup(Self::ENV_ATTEMPT_TIMEOUT) {
            self.retry.attempt_timeout = humantime::parse_duration(raw.trim()).map_err(|e| {
                ConfigError::InvalidOverride {
                    key: Self::ENV_ATTEMPT_TIMEOUT,
                    message: e.to_string(),
                }
            })?;
        }

        if let Some(model) = lookup(Self::ENV_MODEL).filter(|m| !m.trim().is_empty()) {
            self.provider.model = model.trim().to_string();
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.retry.validate()?;
        if self.cache.enabled && self.cache.max_entries == 0 {
            return Err(ConfigError::ValidationError(
                "cache.max_entries must be at least 1 when the cache is enabled".to_string(),
            ));
        }
        Ok(())
    }
}
