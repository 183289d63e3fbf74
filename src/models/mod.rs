//! Shared data models spanning the engine layers.

pub mod indicators;
pub mod signal;

pub use indicators::{Candle, EnrichedRow, IndicatorSet};
pub use signal::{Action, Decision, DecisionSource, Gate, Regime, ScoreRow, SignalWeights};
