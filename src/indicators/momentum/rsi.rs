//! RSI (Relative Strength Index) indicator

use crate::common::math;
use crate::models::indicators::Candle;

/// Calculate RSI for every candle.
///
/// RSI = 100 - (100 / (1 + RS))
/// RS = Wilder-smoothed average gain / Wilder-smoothed average loss
///
/// The first value is available at index `period`.
pub fn calculate_rsi_series(candles: &[Candle], period: u32) -> Vec<Option<f64>> {
    if candles.len() < 2 {
        return vec![None; candles.len()];
    }

    let mut gains = Vec::with_capacity(candles.len() - 1);
    let mut losses = Vec::with_capacity(candles.len() - 1);

    for i in 1..candles.len() {
        let change = candles[i].close - candles[i - 1].close;
        if change > 0.0 {
            gains.push(change);
            losses.push(0.0);
        } else {
            gains.push(0.0);
            losses.push(change.abs());
        }
    }

    let avg_gains = math::wilder_series(&gains, period as usize);
    let avg_losses = math::wilder_series(&losses, period as usize);

    let rsi = avg_gains
        .into_iter()
        .zip(avg_losses)
        .map(|(gain, loss)| Some(rsi_from_averages(gain?, loss?)))
        .collect();

    math::align_from_second(rsi)
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        // A flat window has no momentum either way.
        return if avg_gain == 0.0 { 50.0 } else { 100.0 };
    }
    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}
