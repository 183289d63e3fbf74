//! Oracle collaborator contract, credential pool and retry policy.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::models::signal::{Action, Decision, DecisionSource};
use crate::pipeline::error::OracleError;
use crate::pipeline::request::DecisionRequest;

/// One oracle credential/endpoint.
#[async_trait]
pub trait OracleClient: Send + Sync {
    /// Identifier safe to log; never the raw credential.
    fn name(&self) -> String;

    /// Send the request and return the raw reply text.
    async fn ask(&self, request: &DecisionRequest) -> Result<String, OracleError>;
}

/// Parsed oracle reply.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OracleReply {
    pub action: Action,
    pub reason: String,
}

/// Parse a reply, tolerating markdown code fences around the JSON.
pub fn parse_reply(raw: &str) -> Result<OracleReply, OracleError> {
    let text = raw
        .trim()
        .replace("```json", "")
        .replace("```", "");
    let reply: OracleReply = serde_json::from_str(text.trim())
        .map_err(|e| OracleError::Malformed(format!("{} in {:?}", e, truncate(raw, 200))))?;
    if reply.reason.trim().is_empty() {
        return Err(OracleError::Malformed("empty reason".to_string()));
    }
    Ok(reply)
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Round-robin pool of oracle credentials.
///
/// The cursor persists across decisions, so consecutive decisions start on
/// different credentials. Within one decision, attempts walk a [`Rotation`]
/// and never touch the shared cursor again.
pub struct OraclePool {
    clients: Vec<Arc<dyn OracleClient>>,
    cursor: AtomicUsize,
}

impl OraclePool {
    pub fn new(clients: Vec<Arc<dyn OracleClient>>) -> Self {
        Self {
            clients,
            cursor: AtomicUsize::new(0),
        }
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Reserve a starting credential and return the rotation for one decision.
    pub fn rotation(&self) -> Rotation<'_> {
        let start = if self.clients.is_empty() {
            0
        } else {
            self.cursor.fetch_add(1, Ordering::Relaxed) % self.clients.len()
        };
        Rotation {
            pool: self,
            start,
            attempt: AtomicUsize::new(0),
        }
    }

    /// Starting credential of the next decision, `None` for an empty pool.
    pub fn next(&self) -> Option<Arc<dyn OracleClient>> {
        self.rotation().next()
    }
}

/// Credentials for one decision: each one exactly once, beginning at the
/// reserved offset.
pub struct Rotation<'a> {
    pool: &'a OraclePool,
    start: usize,
    attempt: AtomicUsize,
}

impl Rotation<'_> {
    /// Next untried credential, `None` once every credential has been tried.
    pub fn next(&self) -> Option<Arc<dyn OracleClient>> {
        let len = self.pool.clients.len();
        let attempt = self.attempt.fetch_add(1, Ordering::Relaxed);
        if attempt >= len {
            return None;
        }
        Some(self.pool.clients[(self.start + attempt) % len].clone())
    }
}

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Bound on a single oracle call.
    pub timeout: Duration,
    /// Delay before the first retry; doubles per attempt up to `max_delay`.
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(2),
        }
    }
}

/// Consults the oracle, rotating through the pool on each failed attempt.
///
/// At most one call is in flight per decision and at most `pool.len()`
/// attempts are made; exhaustion degrades to WAIT.
pub struct OracleConsultant {
    pool: Arc<OraclePool>,
    policy: RetryPolicy,
}

impl OracleConsultant {
    pub fn new(pool: Arc<OraclePool>, policy: RetryPolicy) -> Self {
        Self { pool, policy }
    }

    pub fn pool(&self) -> &OraclePool {
        &self.pool
    }

    pub async fn consult(&self, request: &DecisionRequest) -> Decision {
        let max_attempts = self.pool.len();
        if max_attempts == 0 {
            error!("OracleConsultant: no credentials configured");
            return Decision::wait(
                "oracle exhausted: no credentials configured",
                DecisionSource::OracleExhausted { attempts: 0 },
            );
        }

        let backoff = ExponentialBuilder::default()
            .with_min_delay(self.policy.initial_delay)
            .with_max_delay(self.policy.max_delay)
            .with_max_times(max_attempts - 1);

        let rotation = self.pool.rotation();
        let rotation = &rotation;
        let outcome = (move || async move { self.attempt(rotation, request).await })
            .retry(backoff)
            .notify(|err: &OracleError, delay: Duration| {
                warn!(
                    error = %err,
                    delay_ms = delay.as_millis() as u64,
                    "OracleConsultant: attempt failed, rotating credential"
                );
            })
            .await;

        match outcome {
            Ok((credential, reply)) => {
                info!(
                    action = %reply.action,
                    credential = %credential,
                    "OracleConsultant: oracle decided {}",
                    reply.action
                );
                Decision {
                    action: reply.action,
                    reason: reply.reason,
                    source: DecisionSource::Oracle { credential },
                }
            }
            Err(err) => {
                error!(
                    attempts = max_attempts,
                    error = %err,
                    "OracleConsultant: all credentials failed"
                );
                Decision::wait(
                    format!("oracle exhausted after {} attempts: {}", max_attempts, err),
                    DecisionSource::OracleExhausted {
                        attempts: max_attempts,
                    },
                )
            }
        }
    }

    async fn attempt(
        &self,
        rotation: &Rotation<'_>,
        request: &DecisionRequest,
    ) -> Result<(String, OracleReply), OracleError> {
        let client = rotation.next().ok_or(OracleError::EmptyPool)?;
        let raw = tokio::time::timeout(self.policy.timeout, client.ask(request))
            .await
            .map_err(|_| OracleError::Timeout(self.policy.timeout))??;
        let reply = parse_reply(&raw)?;
        Ok((client.name(), reply))
    }
}
