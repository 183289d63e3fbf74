//! Trend-conditional weighting of the directional signals.
//!
//! Four binary signals vote per direction (RSI vs. its bull/bear thresholds,
//! close vs. EMA-200, MACD histogram sign, close vs. VWAP). In a trending
//! regime the trend followers (EMA, MACD) dominate; in a ranging regime the
//! RSI oscillator does.

use crate::config::ScoreConfig;
use crate::models::indicators::IndicatorSet;
use crate::models::signal::{Regime, ScoreRow, SignalWeights};

/// Binary votes for one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DirectionalSignals {
    pub rsi: bool,
    pub ema: bool,
    pub macd: bool,
    pub vwap: bool,
}

/// Regime and weights for an ADX reading. ADX exactly at the threshold is
/// ranging.
pub fn weights_for(adx: f64, config: &ScoreConfig) -> (Regime, SignalWeights) {
    if adx > config.adx_trend_threshold {
        (
            Regime::Trending,
            SignalWeights {
                trend: config.trend_weight,
                oscillator: config.oscillator_weight,
                base: config.base_weight,
            },
        )
    } else {
        (
            Regime::Ranging,
            SignalWeights {
                trend: config.oscillator_weight,
                oscillator: config.trend_weight,
                base: config.base_weight,
            },
        )
    }
}

pub fn bull_signals(
    close: f64,
    indicators: &IndicatorSet,
    config: &ScoreConfig,
) -> DirectionalSignals {
    DirectionalSignals {
        rsi: indicators.rsi < config.rsi_bull_below,
        ema: close > indicators.ema_200,
        macd: indicators.macd_histogram > 0.0,
        vwap: close > indicators.vwap,
    }
}

pub fn bear_signals(
    close: f64,
    indicators: &IndicatorSet,
    config: &ScoreConfig,
) -> DirectionalSignals {
    DirectionalSignals {
        rsi: indicators.rsi > config.rsi_bear_above,
        ema: close < indicators.ema_200,
        macd: indicators.macd_histogram < 0.0,
        vwap: close < indicators.vwap,
    }
}

/// Weighted share of active signals, as a percentage of the total weight.
pub fn weighted_score(signals: &DirectionalSignals, weights: &SignalWeights) -> f64 {
    let total = weights.total();
    if total <= 0.0 {
        return 0.0;
    }

    let vote = |active: bool, weight: f64| if active { weight } else { 0.0 };
    let score = vote(signals.rsi, weights.oscillator)
        + vote(signals.ema, weights.trend)
        + vote(signals.macd, weights.trend)
        + vote(signals.vwap, weights.base);

    (score / total * 100.0).clamp(0.0, 100.0)
}

/// Score one candle from its close and indicator readings.
pub fn score_row(close: f64, indicators: &IndicatorSet, config: &ScoreConfig) -> ScoreRow {
    let (regime, weights) = weights_for(indicators.adx, config);
    ScoreRow {
        score_bull: weighted_score(&bull_signals(close, indicators, config), &weights),
        score_bear: weighted_score(&bear_signals(close, indicators, config), &weights),
        regime,
        weights,
    }
}
