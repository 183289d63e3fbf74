//! Indicator & score engine: candles in, enriched rows out.

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::ScoreConfig;
use crate::indicators::{
    calculate_adx_series, calculate_atr_series, calculate_ema_series,
    calculate_macd_histogram_series, calculate_rsi_series, calculate_volume_sma_series,
    calculate_vwap_series, ema_distance_pct, relative_volume,
};
use crate::models::indicators::{Candle, EnrichedRow, IndicatorSet};
use crate::signals::scoring::score_row;

/// Stateless engine; safe to share across threads and reuse across series.
#[derive(Debug, Clone, Default)]
pub struct ScoreEngine {
    config: ScoreConfig,
}

impl ScoreEngine {
    pub fn new(config: ScoreConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoreConfig {
        &self.config
    }

    /// Candles that fall inside the warm-up window and never produce a row.
    /// EMA-200 dominates with the default periods.
    pub fn warmup(&self) -> usize {
        let c = &self.config;
        [
            c.ema_period as usize,
            c.rsi_period as usize,
            (c.macd_slow + c.macd_signal).saturating_sub(2) as usize,
            c.atr_period as usize,
            (2 * c.adx_period as usize).saturating_sub(1),
            (c.volume_sma_period as usize).saturating_sub(1),
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }

    /// Deduplicate by timestamp (last write wins) and sort ascending.
    pub fn normalize(candles: &[Candle]) -> Vec<Candle> {
        let mut by_time = BTreeMap::new();
        for candle in candles {
            by_time.insert(candle.timestamp, candle.clone());
        }
        by_time.into_values().collect()
    }

    /// Enrich every candle that has complete indicator coverage.
    ///
    /// Too short a series yields an empty result, not an error.
    pub fn run(&self, candles: &[Candle]) -> Vec<EnrichedRow> {
        let candles = Self::normalize(candles);
        let c = &self.config;

        let rsi = calculate_rsi_series(&candles, c.rsi_period);
        let macd =
            calculate_macd_histogram_series(&candles, c.macd_fast, c.macd_slow, c.macd_signal);
        let ema = calculate_ema_series(&candles, c.ema_period);
        let vwap = calculate_vwap_series(&candles);
        let atr = calculate_atr_series(&candles, c.atr_period);
        let adx = calculate_adx_series(&candles, c.adx_period);
        let volume_sma = calculate_volume_sma_series(&candles, c.volume_sma_period);

        let rows: Vec<EnrichedRow> = candles
            .iter()
            .enumerate()
            .filter_map(|(i, candle)| {
                let ema_200 = ema[i]?;
                let volume_sma = volume_sma[i]?;
                let indicators = IndicatorSet {
                    rsi: rsi[i]?,
                    macd_histogram: macd[i]?,
                    ema_200,
                    vwap: vwap[i]?,
                    atr: atr[i]?,
                    adx: adx[i]?,
                    volume_sma,
                    rvol: relative_volume(candle.volume, volume_sma, c.rvol_epsilon),
                    ema_dist: ema_distance_pct(candle.close, ema_200),
                };
                if indicators.readings().iter().any(|(_, v)| !v.is_finite()) {
                    return None;
                }
                let scores = score_row(candle.close, &indicators, c);
                Some(EnrichedRow {
                    candle: candle.clone(),
                    indicators,
                    scores,
                })
            })
            .collect();

        debug!(
            candles = candles.len(),
            rows = rows.len(),
            "ScoreEngine: enriched {} of {} candles",
            rows.len(),
            candles.len()
        );

        rows
    }

    /// The latest fully formed row, if any.
    pub fn latest(&self, candles: &[Candle]) -> Option<EnrichedRow> {
        self.run(candles).pop()
    }
}
