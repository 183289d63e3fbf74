//! Unit tests for VWAP, volume SMA and RVOL

use chrono::DateTime;
use trendgate::indicators::volume::{
    calculate_volume_sma_series, calculate_vwap_series, relative_volume, RVOL_EPSILON,
};
use trendgate::models::indicators::Candle;

fn candle(i: i64, price: f64, volume: f64) -> Candle {
    Candle::new(
        price,
        price,
        price,
        price,
        volume,
        DateTime::from_timestamp(1_700_000_000 + i * 60, 0).unwrap(),
    )
}

#[test]
fn test_vwap_is_cumulative() {
    let vwap = calculate_vwap_series(&[candle(0, 10.0, 1.0), candle(1, 20.0, 3.0)]);
    assert_eq!(vwap[0], Some(10.0));
    assert!((vwap[1].unwrap() - 17.5).abs() < 1e-9);
}

#[test]
fn test_vwap_undefined_until_volume_trades() {
    let vwap = calculate_vwap_series(&[candle(0, 10.0, 0.0), candle(1, 12.0, 2.0)]);
    assert_eq!(vwap[0], None);
    assert_eq!(vwap[1], Some(12.0));
}

#[test]
fn test_volume_sma_window() {
    let candles: Vec<Candle> = (0..25).map(|i| candle(i, 100.0, i as f64)).collect();
    let sma = calculate_volume_sma_series(&candles, 20);
    assert!(sma[..19].iter().all(Option::is_none));
    // mean of 0..=19
    assert!((sma[19].unwrap() - 9.5).abs() < 1e-9);
    // mean of 5..=24
    assert!((sma[24].unwrap() - 14.5).abs() < 1e-9);
}

#[test]
fn test_rvol_zero_average_never_divides_by_zero() {
    assert_eq!(relative_volume(0.0, 0.0, RVOL_EPSILON), 0.0);
    let spike = relative_volume(5.0, 0.0, RVOL_EPSILON);
    assert!(spike.is_finite());
    assert!((spike - 5000.0).abs() < 1e-6);
}

#[test]
fn test_rvol_against_average() {
    let rvol = relative_volume(2000.0, 1000.0, RVOL_EPSILON);
    assert!((rvol - 2000.0 / 1000.001).abs() < 1e-12);
}
