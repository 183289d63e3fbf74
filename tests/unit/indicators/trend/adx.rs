//! Unit tests for ADX indicator

use chrono::DateTime;
use crate::indicator_reference::{assert_close, reference_candles};
use trendgate::indicators::trend::calculate_adx_series;
use trendgate::models::indicators::Candle;

fn candles_from_closes(closes: &[f64]) -> Vec<Candle> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            Candle::new(
                close,
                close + 0.5,
                close - 0.5,
                close,
                1000.0,
                DateTime::from_timestamp(1_700_000_000 + i as i64 * 60, 0).unwrap(),
            )
        })
        .collect()
}

#[test]
fn test_adx_warmup() {
    let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
    let adx = calculate_adx_series(&candles_from_closes(&closes), 14);
    assert!(adx[..27].iter().all(Option::is_none));
    assert!(adx[27..].iter().all(Option::is_some));
}

#[test]
fn test_adx_clean_uptrend_is_maximal() {
    let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
    let adx = calculate_adx_series(&candles_from_closes(&closes), 14);
    assert!((adx[59].unwrap() - 100.0).abs() < 1e-9);
}

#[test]
fn test_adx_flat_market_is_zero() {
    let adx = calculate_adx_series(&candles_from_closes(&[100.0; 60]), 14);
    assert_eq!(adx[59], Some(0.0));
}

#[test]
fn test_adx_bounded_on_zigzag() {
    let closes: Vec<f64> = (0..120)
        .map(|i| 100.0 + 5.0 * (i as f64 / 3.0).sin() + if i % 2 == 0 { 1.0 } else { -1.0 })
        .collect();
    for value in calculate_adx_series(&candles_from_closes(&closes), 14).into_iter().flatten() {
        assert!((0.0..=100.0).contains(&value), "ADX out of range: {}", value);
    }
}

#[test]
fn test_adx_short_input() {
    assert!(calculate_adx_series(&[], 14).is_empty());
    let adx = calculate_adx_series(&candles_from_closes(&[100.0; 20]), 14);
    assert!(adx.iter().all(Option::is_none));
}

#[test]
fn test_adx_reference_values() {
    let adx = calculate_adx_series(&reference_candles(), 14);
    assert!(adx[26].is_none());
    assert_close(adx[27], 89.611740);
    assert_close(adx[28], 86.478332);
    // Trend fades through the pullback, then rebuilds.
    assert_close(adx[40], 41.765445);
    assert_close(adx[59], 63.497137);
}
