//! Numeric kernels shared by the indicator calculators.
//!
//! Series helpers return one `Option<f64>` per input element; `None` marks the
//! warm-up region where the window is not yet complete.

/// True range of a bar relative to the previous close.
pub fn true_range(high: f64, low: f64, prev_close: f64) -> f64 {
    let high_low = high - low;
    let high_close = (high - prev_close).abs();
    let low_close = (low - prev_close).abs();
    high_low.max(high_close).max(low_close)
}

/// Mean of the last `period` values.
pub fn sma(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    let window = &values[values.len() - period..];
    Some(window.iter().sum::<f64>() / period as f64)
}

/// One EMA step with smoothing factor `2 / (period + 1)`.
pub fn ema_from_previous(value: f64, previous: f64, period: usize) -> f64 {
    let alpha = 2.0 / (period as f64 + 1.0);
    alpha * value + (1.0 - alpha) * previous
}

/// One Wilder smoothing step (`alpha = 1 / period`).
pub fn wilder_from_previous(value: f64, previous: f64, period: usize) -> f64 {
    (previous * (period as f64 - 1.0) + value) / period as f64
}

/// Rolling simple moving average, defined from index `period - 1`.
pub fn sma_series(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }
    for i in (period - 1)..values.len() {
        out[i] = sma(&values[..=i], period);
    }
    out
}

/// Exponential moving average seeded with the SMA of the first `period`
/// values. The seed is reported at index `period - 1`.
pub fn ema_series_from_seed(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }
    let mut current = values[..period].iter().sum::<f64>() / period as f64;
    out[period - 1] = Some(current);
    for i in period..values.len() {
        current = ema_from_previous(values[i], current, period);
        out[i] = Some(current);
    }
    out
}

/// Exponential moving average whose seed is not reported: element `i` is
/// defined only once `period` values strictly precede it, so the first
/// `period` elements are `None`.
pub fn ema_series(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = ema_series_from_seed(values, period);
    if period > 0 && out.len() >= period {
        out[period - 1] = None;
    }
    out
}

/// Wilder moving average seeded with the SMA of the first `period` values,
/// defined from index `period - 1`.
pub fn wilder_series(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }
    let mut current = values[..period].iter().sum::<f64>() / period as f64;
    out[period - 1] = Some(current);
    for i in period..values.len() {
        current = wilder_from_previous(values[i], current, period);
        out[i] = Some(current);
    }
    out
}

/// Apply a series kernel to the contiguous defined tail of a partially
/// defined series, keeping the original alignment.
pub fn on_defined_tail<F>(values: &[Option<f64>], kernel: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> Vec<Option<f64>>,
{
    let mut out = vec![None; values.len()];
    let Some(start) = values.iter().position(Option::is_some) else {
        return out;
    };
    let tail: Vec<f64> = values[start..].iter().map_while(|v| *v).collect();
    for (offset, value) in kernel(&tail).into_iter().enumerate() {
        out[start + offset] = value;
    }
    out
}

/// Shift a series computed on `values[1..]` back onto the full index range.
pub fn align_from_second(series: Vec<Option<f64>>) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(series.len() + 1);
    out.push(None);
    out.extend(series);
    out
}
