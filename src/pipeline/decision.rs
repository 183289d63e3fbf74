//! End-to-end decision for one enriched row.

use std::sync::Arc;

use tracing::debug;

use crate::config::ThresholdConfig;
use crate::models::indicators::{Candle, EnrichedRow};
use crate::models::signal::{Decision, DecisionSource};
use crate::pipeline::error::PipelineError;
use crate::pipeline::gates::{FilterDecision, Firewall};
use crate::pipeline::oracle::OracleConsultant;
use crate::signals::engine::ScoreEngine;

/// Gates followed by the oracle. Holds no per-call state, so one instance can
/// serve concurrent decisions for independent symbols.
#[derive(Clone)]
pub struct DecisionPipeline {
    firewall: Firewall,
    consultant: Arc<OracleConsultant>,
}

impl DecisionPipeline {
    pub fn new(
        thresholds: ThresholdConfig,
        consultant: Arc<OracleConsultant>,
    ) -> Result<Self, PipelineError> {
        Ok(Self {
            firewall: Firewall::new(thresholds)?,
            consultant,
        })
    }

    /// Same oracle, different thresholds.
    pub fn with_thresholds(&self, thresholds: ThresholdConfig) -> Result<Self, PipelineError> {
        Self::new(thresholds, self.consultant.clone())
    }

    pub fn firewall(&self) -> &Firewall {
        &self.firewall
    }

    /// Decide for one row. Only precondition violations return `Err`.
    pub async fn decide(&self, row: &EnrichedRow) -> Result<Decision, PipelineError> {
        match self.firewall.evaluate(row)? {
            FilterDecision::Rejected { gate, reason } => Ok(Decision::wait(
                reason,
                DecisionSource::Gate { gate },
            )),
            FilterDecision::Eligible { request } => {
                debug!(
                    timestamp = %row.candle.timestamp,
                    spread = request.context.score_spread,
                    "DecisionPipeline: gates passed, consulting oracle"
                );
                Ok(self.consultant.consult(&request).await)
            }
        }
    }

    /// Score a raw series and decide on its latest row. A series without a
    /// fully formed row resolves to WAIT.
    pub async fn decide_latest(
        &self,
        engine: &ScoreEngine,
        candles: &[Candle],
    ) -> Result<(Option<EnrichedRow>, Decision), PipelineError> {
        let Some(row) = engine.latest(candles) else {
            let decision = Decision::wait(
                format!(
                    "insufficient data: {} candles, more than {} required",
                    candles.len(),
                    engine.warmup()
                ),
                DecisionSource::InsufficientData {
                    candles: candles.len(),
                },
            );
            return Ok((None, decision));
        };
        let decision = self.decide(&row).await?;
        Ok((Some(row), decision))
    }
}
