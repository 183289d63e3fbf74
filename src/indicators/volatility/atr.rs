//! ATR (Average True Range) indicator

use crate::common::math;
use crate::models::indicators::Candle;

/// Calculate ATR for every candle using Wilder's smoothing of true range.
///
/// The first value is available at index `period`.
pub fn calculate_atr_series(candles: &[Candle], period: u32) -> Vec<Option<f64>> {
    if candles.len() < 2 {
        return vec![None; candles.len()];
    }

    let tr_values: Vec<f64> = candles
        .windows(2)
        .map(|pair| math::true_range(pair[1].high, pair[1].low, pair[0].close))
        .collect();

    math::align_from_second(math::wilder_series(&tr_values, period as usize))
}
