use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::signal::ScoreRow;

/// One time-bucketed OHLCV observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn new(
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Typical price `(high + low + close) / 3`, the VWAP price input.
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }
}

/// Indicator readings for one candle, each computed from the trailing window
/// ending at that candle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    /// RSI-14, in [0, 100].
    pub rsi: f64,
    /// MACD(12, 26, 9) line minus its signal line.
    pub macd_histogram: f64,
    pub ema_200: f64,
    /// Cumulative VWAP from the start of the series.
    pub vwap: f64,
    pub atr: f64,
    /// ADX-14, in [0, 100].
    pub adx: f64,
    /// 20-candle simple moving average of volume.
    pub volume_sma: f64,
    /// `volume / (volume_sma + epsilon)`.
    pub rvol: f64,
    /// Percentage distance of close from EMA-200.
    pub ema_dist: f64,
}

impl IndicatorSet {
    /// Named readings in a fixed order, for validation and reporting.
    pub fn readings(&self) -> [(&'static str, f64); 9] {
        [
            ("RSI", self.rsi),
            ("MACD_HIST", self.macd_histogram),
            ("EMA_200", self.ema_200),
            ("VWAP", self.vwap),
            ("ATR", self.atr),
            ("ADX", self.adx),
            ("VOLUME_SMA", self.volume_sma),
            ("RVOL", self.rvol),
            ("EMA_DIST", self.ema_dist),
        ]
    }
}

/// A candle with complete indicator coverage and its scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRow {
    pub candle: Candle,
    pub indicators: IndicatorSet,
    pub scores: ScoreRow,
}
