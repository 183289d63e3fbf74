//! Ordered hard gates ("firewall") in front of the oracle.

use tracing::debug;

use crate::config::ThresholdConfig;
use crate::models::indicators::EnrichedRow;
use crate::models::signal::Gate;
use crate::pipeline::error::PipelineError;
use crate::pipeline::request::DecisionRequest;

/// Outcome of the gates for one row.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterDecision {
    /// A gate failed; the final action is WAIT without consulting the oracle.
    Rejected { gate: Gate, reason: String },
    /// All enabled gates passed; the request goes to the oracle.
    Eligible { request: DecisionRequest },
}

/// Evaluates the gates in [`Gate::ORDER`] and stops at the first failure.
#[derive(Debug, Clone)]
pub struct Firewall {
    thresholds: ThresholdConfig,
}

impl Firewall {
    pub fn new(thresholds: ThresholdConfig) -> Result<Self, PipelineError> {
        thresholds.validate().map_err(PipelineError::InvalidThresholds)?;
        Ok(Self { thresholds })
    }

    pub fn thresholds(&self) -> &ThresholdConfig {
        &self.thresholds
    }

    pub fn evaluate(&self, row: &EnrichedRow) -> Result<FilterDecision, PipelineError> {
        check_row(row)?;

        for gate in Gate::ORDER {
            if let Some(reason) = self.check(gate, row) {
                debug!(
                    gate = gate.as_str(),
                    timestamp = %row.candle.timestamp,
                    reason = %reason,
                    "Firewall: rejected by {} gate",
                    gate.as_str()
                );
                return Ok(FilterDecision::Rejected { gate, reason });
            }
        }

        Ok(FilterDecision::Eligible {
            request: DecisionRequest::build(row, &self.thresholds),
        })
    }

    /// Rejection reason when `gate` fails, `None` when it passes or is disabled.
    fn check(&self, gate: Gate, row: &EnrichedRow) -> Option<String> {
        let t = &self.thresholds;
        let ind = &row.indicators;
        match gate {
            Gate::RsiBand => {
                let outside = ind.rsi > t.rsi_upper || ind.rsi < t.rsi_lower;
                (t.rsi_band_enabled && outside).then(|| {
                    format!(
                        "RSI {:.2} outside safety band [{:.2}, {:.2}]",
                        ind.rsi, t.rsi_lower, t.rsi_upper
                    )
                })
            }
            Gate::TrendStrength => (ind.adx < t.adx_min).then(|| {
                format!("ADX {:.2} below minimum {:.2}: no clear trend", ind.adx, t.adx_min)
            }),
            Gate::Volume => (ind.rvol < t.rvol_min).then(|| {
                format!("RVOL {:.2} below minimum {:.2}: thin volume", ind.rvol, t.rvol_min)
            }),
            Gate::Deviation => (ind.ema_dist.abs() > t.ema_dist_max).then(|| {
                format!(
                    "EMA-200 deviation {:.2}% exceeds maximum {:.2}%",
                    ind.ema_dist, t.ema_dist_max
                )
            }),
        }
    }
}

/// Every indicator and score must be a finite number.
pub fn check_row(row: &EnrichedRow) -> Result<(), PipelineError> {
    let scores = [
        ("SCORE_BULL", row.scores.score_bull),
        ("SCORE_BEAR", row.scores.score_bear),
        ("CLOSE", row.candle.close),
    ];
    for (indicator, value) in row.indicators.readings().into_iter().chain(scores) {
        if !value.is_finite() {
            return Err(PipelineError::NonFiniteIndicator { indicator, value });
        }
    }
    Ok(())
}
