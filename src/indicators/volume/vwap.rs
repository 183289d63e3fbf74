//! VWAP (Volume-Weighted Average Price) indicator

use crate::models::indicators::Candle;

/// Cumulative VWAP anchored at the first candle of the series.
///
/// Undefined while no volume has traded yet.
pub fn calculate_vwap_series(candles: &[Candle]) -> Vec<Option<f64>> {
    let mut price_volume = 0.0;
    let mut volume = 0.0;

    candles
        .iter()
        .map(|candle| {
            price_volume += candle.typical_price() * candle.volume;
            volume += candle.volume;
            (volume > 0.0).then(|| price_volume / volume)
        })
        .collect()
}
