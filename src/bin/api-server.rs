//! Trendgate API Server
//!
//! HTTP API with health check, metrics, scoring and decision endpoints.
//! The service keeps no per-request state and can be horizontally scaled.

use dotenvy::dotenv;
use std::env;
use std::sync::Arc;
use std::time::Instant;
use tokio::signal;
use tokio::sync::RwLock;
use tracing::{error, info};
use trendgate::config::{OracleConfig, ScoreConfig, ThresholdConfig};
use trendgate::core::http::{start_server, AppState, HealthStatus};
use trendgate::logging;
use trendgate::metrics::Metrics;
use trendgate::pipeline::{DecisionPipeline, OracleConsultant, RetryPolicy};
use trendgate::services::build_pool;
use trendgate::signals::ScoreEngine;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    logging::init_logging();

    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let env = trendgate::config::get_environment();
    info!("Starting Trendgate API Server");
    info!(environment = %env, "Environment");

    let thresholds = ThresholdConfig::from_env()?;
    info!(?thresholds, "Gate thresholds loaded");

    let scoring = ScoreConfig::from_env()?;
    info!(?scoring, "Score configuration loaded");

    let oracle_config = OracleConfig::from_env()?;
    let pool = Arc::new(build_pool(&oracle_config)?);
    info!(credentials = pool.len(), "Oracle credential pool ready");

    let consultant = Arc::new(OracleConsultant::new(
        pool,
        RetryPolicy {
            timeout: oracle_config.timeout,
            initial_delay: oracle_config.retry_delay,
            ..RetryPolicy::default()
        },
    ));
    let pipeline = DecisionPipeline::new(thresholds, consultant)?;

    let state = AppState {
        health: Arc::new(RwLock::new(HealthStatus::default())),
        metrics: Arc::new(Metrics::new()?),
        start_time: Arc::new(Instant::now()),
        engine: Arc::new(ScoreEngine::new(scoring)),
        pipeline: Arc::new(pipeline),
    };

    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(port, state).await {
            error!(error = %e, "HTTP server error");
        }
    });

    info!("API server started, waiting for shutdown signal...");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down API server...");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
    }

    Ok(())
}
