//! Decision request forwarded to the oracle once every gate has passed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ThresholdConfig;
use crate::models::indicators::EnrichedRow;

/// ADX above this is described as a strong trend.
pub const STRONG_TREND_ADX: f64 = 25.0;
/// RVOL above this is described as a volume surge.
pub const VOLUME_SURGE_RVOL: f64 = 1.2;
/// RVOL below this is described as thin volume.
pub const VOLUME_THIN_RVOL: f64 = 0.8;
/// RVOL the oracle must see before treating an RSI extreme as continuation.
pub const BREAKOUT_RVOL: f64 = 1.5;
/// Minimum bull/bear spread for an entry.
pub const MIN_SCORE_SPREAD: f64 = 15.0;
/// Score that overrides the thin-volume rule.
pub const THIN_VOLUME_OVERRIDE_SCORE: f64 = 85.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RsiRegime {
    #[serde(rename = "safe zone")]
    SafeZone,
    #[serde(rename = "overbought-stall")]
    OverboughtStall,
    #[serde(rename = "oversold-stall")]
    OversoldStall,
}

impl RsiRegime {
    pub fn classify(rsi: f64, thresholds: &ThresholdConfig) -> Self {
        if rsi > thresholds.rsi_upper {
            RsiRegime::OverboughtStall
        } else if rsi < thresholds.rsi_lower {
            RsiRegime::OversoldStall
        } else {
            RsiRegime::SafeZone
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendLabel {
    StrongTrend,
    Ranging,
}

impl TrendLabel {
    pub fn classify(adx: f64) -> Self {
        if adx > STRONG_TREND_ADX {
            TrendLabel::StrongTrend
        } else {
            TrendLabel::Ranging
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeLabel {
    Surge,
    Normal,
    Thin,
}

impl VolumeLabel {
    pub fn classify(rvol: f64) -> Self {
        if rvol > VOLUME_SURGE_RVOL {
            VolumeLabel::Surge
        } else if rvol < VOLUME_THIN_RVOL {
            VolumeLabel::Thin
        } else {
            VolumeLabel::Normal
        }
    }
}

/// Readings and regime labels of the candle under decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestContext {
    pub timestamp: DateTime<Utc>,
    pub close: f64,
    pub adx: f64,
    pub trend_label: TrendLabel,
    pub rvol: f64,
    pub volume_label: VolumeLabel,
    pub rsi: f64,
    pub rsi_regime: RsiRegime,
    pub ema_200: f64,
    pub ema_dist: f64,
    pub macd_histogram: f64,
    pub score_bull: f64,
    pub score_bear: f64,
    /// `|score_bull - score_bear|`.
    pub score_spread: f64,
    /// The dominant score agrees with the side of EMA-200 price is on.
    pub trend_consistent: bool,
    pub rsi_band_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRequest {
    pub context: RequestContext,
    /// Free-text instructions for the oracle.
    pub task: String,
}

impl DecisionRequest {
    pub fn build(row: &EnrichedRow, thresholds: &ThresholdConfig) -> Self {
        let ind = &row.indicators;
        let scores = &row.scores;

        let trend_consistent = if scores.score_bull > scores.score_bear {
            ind.ema_dist > 0.0
        } else if scores.score_bear > scores.score_bull {
            ind.ema_dist < 0.0
        } else {
            false
        };

        let context = RequestContext {
            timestamp: row.candle.timestamp,
            close: row.candle.close,
            adx: ind.adx,
            trend_label: TrendLabel::classify(ind.adx),
            rvol: ind.rvol,
            volume_label: VolumeLabel::classify(ind.rvol),
            rsi: ind.rsi,
            rsi_regime: RsiRegime::classify(ind.rsi, thresholds),
            ema_200: ind.ema_200,
            ema_dist: ind.ema_dist,
            macd_histogram: ind.macd_histogram,
            score_bull: scores.score_bull,
            score_bear: scores.score_bear,
            score_spread: (scores.score_bull - scores.score_bear).abs(),
            trend_consistent,
            rsi_band_enabled: thresholds.rsi_band_enabled,
        };

        let task = task_description(&context);
        Self { context, task }
    }

    /// Full prompt text: the task followed by the context as JSON.
    pub fn render_prompt(&self) -> Result<String, serde_json::Error> {
        Ok(format!(
            "{}\n\nMarket context (JSON):\n{}",
            self.task,
            serde_json::to_string_pretty(&self.context)?
        ))
    }
}

fn task_description(context: &RequestContext) -> String {
    let mut rules = vec![
        format!(
            "Never trade on thin volume: if RVOL < {:.1}, answer WAIT unless one score \
             is {:.0} or higher.",
            VOLUME_THIN_RVOL, THIN_VOLUME_OVERRIDE_SCORE
        ),
        format!(
            "Follow the trend: when ADX > {:.0}, only trade in the direction of price \
             relative to EMA-200.",
            STRONG_TREND_ADX
        ),
        format!(
            "Require a bull/bear score spread above {:.0} points before entering.",
            MIN_SCORE_SPREAD
        ),
    ];
    if !context.rsi_band_enabled {
        rules.push(format!(
            "RSI is not pre-filtered. If RSI is in an overbought or oversold stall, decide \
             whether it is exhaustion (answer WAIT) or momentum continuation (acceptable \
             only with RVOL > {:.1}, breakout volume).",
            BREAKOUT_RVOL
        ));
    }

    let numbered: Vec<String> = rules
        .iter()
        .enumerate()
        .map(|(i, rule)| format!("{}. {}", i + 1, rule))
        .collect();

    format!(
        "You are a quantitative crypto trader. The candle below has passed the hard filters. \
         Combine trend strength (ADX) with volume participation (RVOL) and the composite scores \
         to choose an action.\n\nRules:\n{}\n\n\
         Reply with JSON only: {{\"action\": \"BUY\" | \"SELL\" | \"WAIT\", \
         \"reason\": \"<analysis, including your view on RVOL>\"}}",
        numbered.join("\n")
    )
}
