//! AI oracle credentials and call policy.

use std::time::Duration;

use super::{env_parse, ConfigError};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Clone)]
pub struct OracleConfig {
    /// Credential pool, rotated in order.
    pub api_keys: Vec<String>,
    /// Model name; discovered per credential when absent.
    pub model: Option<String>,
    pub base_url: String,
    /// Bound on a single oracle call.
    pub timeout: Duration,
    /// Initial delay between attempts on successive credentials.
    pub retry_delay: Duration,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            api_keys: Vec::new(),
            model: None,
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            retry_delay: Duration::from_millis(250),
        }
    }
}

impl OracleConfig {
    /// Load from `GEMINI_KEYS` (required, comma-separated), `GEMINI_MODEL`,
    /// `GEMINI_BASE_URL`, `ORACLE_TIMEOUT_SECS` and `ORACLE_RETRY_DELAY_MS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw_keys =
            std::env::var("GEMINI_KEYS").map_err(|_| ConfigError::Missing("GEMINI_KEYS"))?;
        let api_keys = parse_keys(&raw_keys);
        if api_keys.is_empty() {
            return Err(ConfigError::Invalid {
                name: "GEMINI_KEYS",
                value: "<empty>".to_string(),
            });
        }

        let defaults = Self::default();
        Ok(Self {
            api_keys,
            model: std::env::var("GEMINI_MODEL")
                .ok()
                .filter(|m| !m.trim().is_empty()),
            base_url: std::env::var("GEMINI_BASE_URL").unwrap_or(defaults.base_url),
            timeout: env_parse("ORACLE_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            retry_delay: env_parse("ORACLE_RETRY_DELAY_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.retry_delay),
        })
    }
}

/// Split a comma-separated key list, dropping blanks.
pub fn parse_keys(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}
