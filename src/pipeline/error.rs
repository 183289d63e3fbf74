use std::time::Duration;
use thiserror::Error;

/// Failures that cross the pipeline boundary. Everything else resolves to a
/// [`Decision`](crate::models::signal::Decision).
#[derive(Debug, Error, PartialEq)]
pub enum PipelineError {
    #[error("row has no usable {indicator} reading ({value})")]
    NonFiniteIndicator { indicator: &'static str, value: f64 },
    #[error("invalid thresholds: {0}")]
    InvalidThresholds(String),
}

/// A single failed oracle attempt. All variants rotate to the next credential.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("oracle call timed out after {0:?}")]
    Timeout(Duration),
    #[error("oracle transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("oracle rejected credential (HTTP {0})")]
    Unauthorized(u16),
    #[error("oracle returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed oracle reply: {0}")]
    Malformed(String),
    #[error("no model supporting generateContent is available")]
    NoModel,
    #[error("failed to encode oracle request: {0}")]
    Encoding(#[from] serde_json::Error),
    #[error("oracle pool has no credentials")]
    EmptyPool,
}
