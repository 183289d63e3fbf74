//! Gate thresholds for the decision pipeline.

use serde::{Deserialize, Serialize};
use std::fs;

use super::{env_parse, ConfigError};

/// Parameters of the four hard gates. Immutable for the duration of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    /// Enables the RSI safety band (gate 1).
    pub rsi_band_enabled: bool,
    pub rsi_lower: f64,
    pub rsi_upper: f64,
    /// Minimum ADX; lower readings are treated as chop.
    pub adx_min: f64,
    /// Minimum relative volume.
    pub rvol_min: f64,
    /// Maximum absolute distance from EMA-200, in percent.
    pub ema_dist_max: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            rsi_band_enabled: false,
            rsi_lower: 30.0,
            rsi_upper: 70.0,
            adx_min: 25.0,
            rvol_min: 0.8,
            ema_dist_max: 3.0,
        }
    }
}

impl ThresholdConfig {
    /// Load thresholds: defaults, then the JSON file at `THRESHOLDS_PATH` if
    /// set, then per-field `GATE_*` overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match std::env::var("THRESHOLDS_PATH") {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };

        if let Some(v) = env_parse("GATE_RSI_BAND_ENABLED")? {
            config.rsi_band_enabled = v;
        }
        if let Some(v) = env_parse("GATE_RSI_LOWER")? {
            config.rsi_lower = v;
        }
        if let Some(v) = env_parse("GATE_RSI_UPPER")? {
            config.rsi_upper = v;
        }
        if let Some(v) = env_parse("GATE_ADX_MIN")? {
            config.adx_min = v;
        }
        if let Some(v) = env_parse("GATE_RVOL_MIN")? {
            config.rvol_min = v;
        }
        if let Some(v) = env_parse("GATE_EMA_DIST_MAX")? {
            config.ema_dist_max = v;
        }

        Ok(config)
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }

    /// Check that the thresholds form a consistent set.
    pub fn validate(&self) -> Result<(), String> {
        let fields = [
            ("rsi_lower", self.rsi_lower),
            ("rsi_upper", self.rsi_upper),
            ("adx_min", self.adx_min),
            ("rvol_min", self.rvol_min),
            ("ema_dist_max", self.ema_dist_max),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{} must be a non-negative number, got {}", name, value));
            }
        }
        if self.rsi_lower >= self.rsi_upper {
            return Err(format!(
                "rsi_lower ({}) must be below rsi_upper ({})",
                self.rsi_lower, self.rsi_upper
            ));
        }
        if self.rsi_upper > 100.0 {
            return Err(format!("rsi_upper must not exceed 100, got {}", self.rsi_upper));
        }
        Ok(())
    }
}
