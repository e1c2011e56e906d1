//! Configuration for the namecheck prediction service.
//!
//! - [`ServerConfig`] — Settings read once at process start
//! - [`ConfigError`] — Missing or unparsable settings
//!
//! Settings come from the process environment (after `.env` is loaded by
//! the binary). The provider credential is mandatory; everything else has a
//! default.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `OPENAI_API_KEY` | required |
//! | `OPENAI_API_BASE` | provider default |
//! | `NAMECHECK_BIND` | `0.0.0.0:5000` |
//! | `NAMECHECK_UPSTREAM_TIMEOUT_SECS` | `30` |
//! | `NAMECHECK_PRECHECK` | `false` |
//! | `NAMECHECK_MAX_TOKENS` | `60` |
//! | `NAMECHECK_TEMPERATURE` | `0.0` |
//!
//! # Example
//!
//! ```rust
//! use namecheck_config::ServerConfig;
//!
//! let config = ServerConfig::from_lookup(|key| match key {
//!     "OPENAI_API_KEY" => Some("sk-test".to_string()),
//!     _ => None,
//! })
//! .unwrap();
//!
//! assert_eq!(config.bind_addr, "0.0.0.0:5000");
//! assert!(!config.precheck);
//! ```

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use namecheck_core::PredictionError;

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const API_BASE_VAR: &str = "OPENAI_API_BASE";
pub const BIND_VAR: &str = "NAMECHECK_BIND";
pub const TIMEOUT_VAR: &str = "NAMECHECK_UPSTREAM_TIMEOUT_SECS";
pub const PRECHECK_VAR: &str = "NAMECHECK_PRECHECK";
pub const MAX_TOKENS_VAR: &str = "NAMECHECK_MAX_TOKENS";
pub const TEMPERATURE_VAR: &str = "NAMECHECK_TEMPERATURE";

const DEFAULT_BIND: &str = "0.0.0.0:5000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_TOKENS: u32 = 60;

/// Errors raised while reading configuration.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConfigError {
    /// A required variable is absent or blank.
    #[error("{0} environment variable not set. Make sure you have a .env file with this key.")]
    MissingVar(&'static str),

    /// A variable is present but cannot be parsed.
    #[error("Invalid value for {var}: '{value}' ({message})")]
    InvalidVar {
        var: &'static str,
        value: String,
        message: String,
    },
}

impl ConfigError {
    fn invalid(var: &'static str, value: &str, message: impl fmt::Display) -> Self {
        Self::InvalidVar {
            var,
            value: value.to_string(),
            message: message.to_string(),
        }
    }
}

impl From<ConfigError> for PredictionError {
    fn from(err: ConfigError) -> Self {
        PredictionError::Configuration(err.to_string())
    }
}

/// Prediction service settings.
#[derive(Clone)]
pub struct ServerConfig {
    pub api_key: String,
    pub api_base: Option<String>,
    pub bind_addr: String,
    /// Ceiling for a single provider call.
    pub upstream_timeout: Duration,
    /// Answer obviously malformed names locally without calling the provider.
    pub precheck: bool,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("bind_addr", &self.bind_addr)
            .field("upstream_timeout", &self.upstream_timeout)
            .field("precheck", &self.precheck)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl ServerConfig {
    /// Creates a config with the given credential and default settings.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: None,
            bind_addr: DEFAULT_BIND.to_string(),
            upstream_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            precheck: false,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: 0.0,
        }
    }

    /// Reads the config from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the config through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_key = get(API_KEY_VAR).ok_or(ConfigError::MissingVar(API_KEY_VAR))?;
        let mut config = Self::new(api_key);

        config.api_base = get(API_BASE_VAR);
        if let Some(bind) = get(BIND_VAR) {
            config.bind_addr = bind;
        }
        if let Some(raw) = get(TIMEOUT_VAR) {
            let secs: u64 = parse_var(TIMEOUT_VAR, &raw)?;
            if secs == 0 {
                return Err(ConfigError::invalid(TIMEOUT_VAR, &raw, "must be positive"));
            }
            config.upstream_timeout = Duration::from_secs(secs);
        }
        if let Some(raw) = get(PRECHECK_VAR) {
            config.precheck = parse_flag(PRECHECK_VAR, &raw)?;
        }
        if let Some(raw) = get(MAX_TOKENS_VAR) {
            config.max_tokens = parse_var(MAX_TOKENS_VAR, &raw)?;
        }
        if let Some(raw) = get(TEMPERATURE_VAR) {
            let temperature: f32 = parse_var(TEMPERATURE_VAR, &raw)?;
            if !(0.0..=2.0).contains(&temperature) {
                return Err(ConfigError::invalid(TEMPERATURE_VAR, &raw, "expected 0.0..=2.0"));
            }
            config.temperature = temperature;
        }

        Ok(config)
    }

    /// Overrides the provider base URL.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    /// Enables or disables the local pre-check.
    pub fn with_precheck(mut self, enabled: bool) -> Self {
        self.precheck = enabled;
        self
    }

    /// Sets the per-call provider timeout.
    pub fn with_upstream_timeout(mut self, timeout: Duration) -> Self {
        self.upstream_timeout = timeout;
        self
    }
}

fn parse_var<T>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    raw.parse().map_err(|e| ConfigError::invalid(var, raw, e))
}

fn parse_flag(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::invalid(var, raw, "expected true or false")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_key_is_fatal() {
        let err = ServerConfig::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err, ConfigError::MissingVar(API_KEY_VAR));
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let err = ServerConfig::from_lookup(lookup(&[(API_KEY_VAR, "   ")])).unwrap_err();
        assert_eq!(err, ConfigError::MissingVar(API_KEY_VAR));
    }

    #[test]
    fn defaults_apply() {
        let config = ServerConfig::from_lookup(lookup(&[(API_KEY_VAR, "sk-1")])).unwrap();
        assert_eq!(config.api_key, "sk-1");
        assert_eq!(config.api_base, None);
        assert_eq!(config.upstream_timeout, Duration::from_secs(30));
        assert_eq!(config.max_tokens, 60);
        assert_eq!(config.temperature, 0.0);
    }

    #[test]
    fn overrides_are_parsed() {
        let config = ServerConfig::from_lookup(lookup(&[
            (API_KEY_VAR, "sk-1"),
            (API_BASE_VAR, "http://localhost:8080/v1"),
            (BIND_VAR, "127.0.0.1:9000"),
            (TIMEOUT_VAR, "5"),
            (PRECHECK_VAR, "TRUE"),
            (MAX_TOKENS_VAR, "80"),
            (TEMPERATURE_VAR, "0.5"),
        ]))
        .unwrap();
        assert_eq!(config.api_base.as_deref(), Some("http://localhost:8080/v1"));
        assert_eq!(config.bind_addr, "127.0.0.1:9000");
        assert_eq!(config.upstream_timeout, Duration::from_secs(5));
        assert!(config.precheck);
        assert_eq!(config.max_tokens, 80);
        assert_eq!(config.temperature, 0.5);
    }

    #[test]
    fn bad_values_are_rejected() {
        let err = ServerConfig::from_lookup(lookup(&[(API_KEY_VAR, "k"), (TIMEOUT_VAR, "soon")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVar { var: TIMEOUT_VAR, .. }));

        let err = ServerConfig::from_lookup(lookup(&[(API_KEY_VAR, "k"), (TIMEOUT_VAR, "0")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVar { var: TIMEOUT_VAR, .. }));

        let err = ServerConfig::from_lookup(lookup(&[(API_KEY_VAR, "k"), (PRECHECK_VAR, "maybe")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVar { var: PRECHECK_VAR, .. }));
    }

    #[test]
    fn debug_redacts_key() {
        let config = ServerConfig::new("sk-secret");
        assert!(!format!("{:?}", config).contains("sk-secret"));
    }

    #[test]
    fn converts_into_configuration_error() {
        let err: PredictionError = ConfigError::MissingVar(API_KEY_VAR).into();
        assert!(matches!(err, PredictionError::Configuration(_)));
    }
}
