//! EMA (Exponential Moving Average) indicator

use crate::common::math;
use crate::models::indicators::Candle;

/// Calculate the EMA of closes for every candle.
///
/// Values are undefined for the first `period` candles: the SMA seed over
/// that window is consumed before the first EMA value is reported.
pub fn calculate_ema_series(candles: &[Candle], period: u32) -> Vec<Option<f64>> {
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    math::ema_series(&closes, period as usize)
}

/// Percentage distance of `close` from `ema`.
pub fn ema_distance_pct(close: f64, ema: f64) -> f64 {
    (close - ema) / ema * 100.0
}
