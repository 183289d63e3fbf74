//! MACD (Moving Average Convergence Divergence) indicator

use crate::common::math;
use crate::models::indicators::Candle;

/// Calculate the MACD histogram for every candle.
///
/// MACD = EMA(fast) - EMA(slow)
/// Signal = EMA(signal) of MACD
/// Histogram = MACD - Signal
///
/// Each EMA is seeded with the SMA of its first `period` inputs, so the first
/// histogram value is available at index `slow + signal - 2`.
pub fn calculate_macd_histogram_series(
    candles: &[Candle],
    fast_period: u32,
    slow_period: u32,
    signal_period: u32,
) -> Vec<Option<f64>> {
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();

    let fast = math::ema_series_from_seed(&closes, fast_period as usize);
    let slow = math::ema_series_from_seed(&closes, slow_period as usize);

    let macd_line: Vec<Option<f64>> = fast
        .iter()
        .zip(&slow)
        .map(|(f, s)| Some((*f)? - (*s)?))
        .collect();

    let signal_line = math::on_defined_tail(&macd_line, |values| {
        math::ema_series_from_seed(values, signal_period as usize)
    });

    macd_line
        .iter()
        .zip(&signal_line)
        .map(|(m, s)| Some((*m)? - (*s)?))
        .collect()
}
