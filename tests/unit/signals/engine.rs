//! Unit tests for the indicator & score engine

use chrono::DateTime;
use trendgate::models::indicators::Candle;
use trendgate::signals::engine::ScoreEngine;

fn create_market_candles(count: usize) -> Vec<Candle> {
    (0..count)
        .map(|i| {
            let t = i as f64;
            let price = 100.0 + 10.0 * (t / 10.0).sin() + 0.05 * t;
            Candle::new(
                price - 0.3,
                price + 1.0,
                price - 1.0,
                price,
                1000.0 + 100.0 * (i % 7) as f64,
                DateTime::from_timestamp(1_700_000_000 + i as i64 * 900, 0).unwrap(),
            )
        })
        .collect()
}

#[test]
fn test_empty_input_yields_no_rows() {
    assert!(ScoreEngine::default().run(&[]).is_empty());
    assert!(ScoreEngine::default().latest(&[]).is_none());
}

#[test]
fn test_short_series_yields_no_rows() {
    let candles = create_market_candles(150);
    assert!(ScoreEngine::default().run(&candles).is_empty());
}

#[test]
fn test_warmup_boundary_250_candles() {
    let candles = create_market_candles(250);
    let engine = ScoreEngine::default();
    assert_eq!(engine.warmup(), 200);

    let rows = engine.run(&candles);
    assert_eq!(rows.len(), 50);
    assert_eq!(rows[0].candle.timestamp, candles[200].timestamp);
    assert_eq!(rows[49].candle.timestamp, candles[249].timestamp);
    assert!(rows.iter().all(|r| r.indicators.ema_200.is_finite()));
}

#[test]
fn test_scores_bounded() {
    let rows = ScoreEngine::default().run(&create_market_candles(400));
    assert_eq!(rows.len(), 200);
    for row in rows {
        assert!((0.0..=100.0).contains(&row.scores.score_bull));
        assert!((0.0..=100.0).contains(&row.scores.score_bear));
        assert!((0.0..=100.0).contains(&row.indicators.rsi));
        assert!((0.0..=100.0).contains(&row.indicators.adx));
        assert!(row.indicators.rvol >= 0.0);
    }
}

#[test]
fn test_weights_follow_adx_on_every_row() {
    for row in ScoreEngine::default().run(&create_market_candles(300)) {
        if row.indicators.adx > 25.0 {
            assert_eq!(row.scores.weights.trend, 2.0);
            assert_eq!(row.scores.weights.oscillator, 0.5);
        } else {
            assert_eq!(row.scores.weights.trend, 0.5);
            assert_eq!(row.scores.weights.oscillator, 2.0);
        }
        assert_eq!(row.scores.weights.base, 1.0);
    }
}

#[test]
fn test_run_is_idempotent() {
    let candles = create_market_candles(300);
    let engine = ScoreEngine::default();
    let first = engine.run(&candles);
    let second = engine.run(&candles);
    assert_eq!(first, second);
}

#[test]
fn test_unsorted_input_is_normalized() {
    let candles = create_market_candles(250);
    let mut reversed = candles.clone();
    reversed.reverse();
    let engine = ScoreEngine::default();
    assert_eq!(engine.run(&reversed), engine.run(&candles));
}

#[test]
fn test_duplicate_timestamps_last_write_wins() {
    let candles = create_market_candles(250);
    let mut revised = candles[249].clone();
    revised.close += 5.0;

    let mut input = candles.clone();
    input.push(revised.clone());

    let rows = ScoreEngine::default().run(&input);
    assert_eq!(rows.len(), 50);
    assert_eq!(rows[49].candle.close, revised.close);
}

#[test]
fn test_normalize_dedup_and_sort() {
    let candles = create_market_candles(3);
    let input = vec![
        candles[2].clone(),
        candles[0].clone(),
        candles[1].clone(),
        candles[0].clone(),
    ];
    let normalized = ScoreEngine::normalize(&input);
    assert_eq!(normalized, candles);
}

#[test]
fn test_zero_volume_candle_keeps_rvol_finite() {
    let mut candles = create_market_candles(260);
    for candle in candles.iter_mut().skip(230) {
        candle.volume = 0.0;
    }
    let rows = ScoreEngine::default().run(&candles);
    let last = rows.last().unwrap();
    assert_eq!(last.indicators.volume_sma, 0.0);
    assert_eq!(last.indicators.rvol, 0.0);
}

#[test]
fn test_latest_is_last_row() {
    let candles = create_market_candles(260);
    let engine = ScoreEngine::default();
    let latest = engine.latest(&candles).unwrap();
    assert_eq!(latest.candle.timestamp, candles[259].timestamp);
}
