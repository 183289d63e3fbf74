//! Volume moving average and RVOL

use crate::common::math;
use crate::models::indicators::Candle;

/// Default guard added to the volume average before dividing.
pub const RVOL_EPSILON: f64 = 0.001;

/// Simple moving average of volume, defined from index `period - 1`.
pub fn calculate_volume_sma_series(candles: &[Candle], period: u32) -> Vec<Option<f64>> {
    let volumes: Vec<f64> = candles.iter().map(|c| c.volume).collect();
    math::sma_series(&volumes, period as usize)
}

/// Relative volume `volume / (volume_sma + epsilon)`.
///
/// With a positive `epsilon` and non-negative volumes the denominator is never
/// zero, so illiquid stretches give a damped ratio instead of a division error.
pub fn relative_volume(volume: f64, volume_sma: f64, epsilon: f64) -> f64 {
    volume / (volume_sma + epsilon)
}
