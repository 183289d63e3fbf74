//! ADX (Average Directional Index) indicator

use crate::common::math;
use crate::models::indicators::Candle;

/// Calculate ADX for every candle.
///
/// ADX measures trend strength regardless of direction. True range, +DM and
/// -DM are Wilder-smoothed into +DI / -DI, their normalised spread gives DX,
/// and ADX is the Wilder average of DX. The first value is available at index
/// `2 * period - 1`.
pub fn calculate_adx_series(candles: &[Candle], period: u32) -> Vec<Option<f64>> {
    if candles.len() < 2 {
        return vec![None; candles.len()];
    }
    let period = period as usize;

    let mut tr_values = Vec::with_capacity(candles.len() - 1);
    let mut plus_dm_values = Vec::with_capacity(candles.len() - 1);
    let mut minus_dm_values = Vec::with_capacity(candles.len() - 1);

    for i in 1..candles.len() {
        tr_values.push(math::true_range(
            candles[i].high,
            candles[i].low,
            candles[i - 1].close,
        ));

        let up_move = candles[i].high - candles[i - 1].high;
        let down_move = candles[i - 1].low - candles[i].low;

        plus_dm_values.push(if up_move > down_move && up_move > 0.0 {
            up_move
        } else {
            0.0
        });
        minus_dm_values.push(if down_move > up_move && down_move > 0.0 {
            down_move
        } else {
            0.0
        });
    }

    let smoothed_tr = math::wilder_series(&tr_values, period);
    let smoothed_plus = math::wilder_series(&plus_dm_values, period);
    let smoothed_minus = math::wilder_series(&minus_dm_values, period);

    let dx: Vec<Option<f64>> = (0..tr_values.len())
        .map(|i| {
            let tr = smoothed_tr[i]?;
            let plus_di = directional_index(smoothed_plus[i]?, tr);
            let minus_di = directional_index(smoothed_minus[i]?, tr);
            let di_sum = plus_di + minus_di;
            Some(if di_sum > 0.0 {
                100.0 * (plus_di - minus_di).abs() / di_sum
            } else {
                0.0
            })
        })
        .collect();

    let adx = math::on_defined_tail(&dx, |values| math::wilder_series(values, period));
    math::align_from_second(adx)
}

fn directional_index(smoothed_dm: f64, smoothed_tr: f64) -> f64 {
    if smoothed_tr > 0.0 {
        100.0 * smoothed_dm / smoothed_tr
    } else {
        0.0
    }
}
