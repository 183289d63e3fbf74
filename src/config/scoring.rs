//! Indicator periods and score weighting.

use serde::{Deserialize, Serialize};
use std::fs;

use super::ConfigError;
use crate::indicators::volume::RVOL_EPSILON;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreConfig {
    pub rsi_period: u32,
    pub macd_fast: u32,
    pub macd_slow: u32,
    pub macd_signal: u32,
    pub ema_period: u32,
    pub atr_period: u32,
    pub adx_period: u32,
    pub volume_sma_period: u32,
    pub rvol_epsilon: f64,
    /// RSI below this counts as a bullish signal.
    pub rsi_bull_below: f64,
    /// RSI above this counts as a bearish signal.
    pub rsi_bear_above: f64,
    /// ADX strictly above this selects the trending weights.
    pub adx_trend_threshold: f64,
    pub trend_weight: f64,
    pub oscillator_weight: f64,
    pub base_weight: f64,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            ema_period: 200,
            atr_period: 14,
            adx_period: 14,
            volume_sma_period: 20,
            rvol_epsilon: RVOL_EPSILON,
            rsi_bull_below: 45.0,
            rsi_bear_above: 55.0,
            adx_trend_threshold: 25.0,
            trend_weight: 2.0,
            oscillator_weight: 0.5,
            base_weight: 1.0,
        }
    }
}

impl ScoreConfig {
    /// Defaults, or the JSON file named by `SCORING_PATH` when set. Missing
    /// fields in the file keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = match std::env::var("SCORING_PATH") {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };
        config.validate().map_err(|value| ConfigError::Invalid {
            name: "SCORING_PATH",
            value,
        })?;
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

    pub fn validate(&self) -> Result<(), String> {
        let periods = [
            ("rsi_period", self.rsi_period),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
            ("ema_period", self.ema_period),
            ("atr_period", self.atr_period),
            ("adx_period", self.adx_period),
            ("volume_sma_period", self.volume_sma_period),
        ];
        for (name, period) in periods {
            if period == 0 {
                return Err(format!("{} must be at least 1", name));
            }
        }
        if self.macd_fast >= self.macd_slow {
            return Err(format!(
                "macd_fast ({}) must be below macd_slow ({})",
                self.macd_fast, self.macd_slow
            ));
        }
        if !(self.rvol_epsilon.is_finite() && self.rvol_epsilon > 0.0) {
            return Err(format!("rvol_epsilon must be positive, got {}", self.rvol_epsilon));
        }
        let weights = [
            ("trend_weight", self.trend_weight),
            ("oscillator_weight", self.oscillator_weight),
            ("base_weight", self.base_weight),
        ];
        for (name, weight) in weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(format!("{} must be a non-negative number, got {}", name, weight));
            }
        }
        Ok(())
    }
}
