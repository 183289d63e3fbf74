use serde::{Deserialize, Serialize};
use std::fmt;

/// Weight regime selected from ADX.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    Trending,
    Ranging,
}

/// Weights applied to the directional signals of one candle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalWeights {
    /// Applied to both the EMA-200 and the MACD histogram signals.
    pub trend: f64,
    /// Applied to the RSI signal.
    pub oscillator: f64,
    /// Applied to the VWAP signal.
    pub base: f64,
}

impl SignalWeights {
    pub fn total(&self) -> f64 {
        self.oscillator + 2.0 * self.trend + self.base
    }
}

/// Composite bull/bear scores of one candle, each in [0, 100].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRow {
    pub score_bull: f64,
    pub score_bear: f64,
    pub regime: Regime,
    pub weights: SignalWeights,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Buy,
    Sell,
    Wait,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Buy => write!(f, "BUY"),
            Action::Sell => write!(f, "SELL"),
            Action::Wait => write!(f, "WAIT"),
        }
    }
}

/// Hard filters, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gate {
    RsiBand,
    TrendStrength,
    Volume,
    Deviation,
}

impl Gate {
    pub const ORDER: [Gate; 4] = [
        Gate::RsiBand,
        Gate::TrendStrength,
        Gate::Volume,
        Gate::Deviation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gate::RsiBand => "rsi_band",
            Gate::TrendStrength => "adx",
            Gate::Volume => "rvol",
            Gate::Deviation => "ema_dist",
        }
    }
}

/// Where a final decision came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecisionSource {
    Gate { gate: Gate },
    Oracle { credential: String },
    OracleExhausted { attempts: usize },
    InsufficientData { candles: usize },
}

impl DecisionSource {
    pub fn label(&self) -> &'static str {
        match self {
            DecisionSource::Gate { .. } => "gate",
            DecisionSource::Oracle { .. } => "oracle",
            DecisionSource::OracleExhausted { .. } => "oracle_exhausted",
            DecisionSource::InsufficientData { .. } => "insufficient_data",
        }
    }
}

/// Final trading decision. `reason` is always populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub action: Action,
    pub reason: String,
    pub source: DecisionSource,
}

impl Decision {
    pub fn wait(reason: impl Into<String>, source: DecisionSource) -> Self {
        Self {
            action: Action::Wait,
            reason: reason.into(),
            source,
        }
    }
}
