//! HTTP endpoint server using Axum

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, warn, Level};

use crate::config::ThresholdConfig;
use crate::metrics::Metrics;
use crate::models::indicators::{Candle, EnrichedRow};
use crate::models::signal::Decision;
use crate::pipeline::{DecisionPipeline, PipelineError};
use crate::signals::engine::ScoreEngine;

#[derive(Clone)]
pub struct AppState {
    pub health: Arc<RwLock<HealthStatus>>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub engine: Arc<ScoreEngine>,
    pub pipeline: Arc<DecisionPipeline>,
}

#[derive(Clone, Debug)]
pub struct HealthStatus {
    pub status: String,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let health = state.health.read().await;
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": health.status,
        "uptime_seconds": uptime_seconds,
        "service": "trendgate"
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();

    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();

    state.metrics.http_requests_in_flight.dec();
    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

#[derive(Debug, Deserialize)]
pub struct ScoresRequest {
    pub candles: Vec<Candle>,
    #[serde(default)]
    pub latest_only: bool,
}

#[derive(Debug, Serialize)]
pub struct ScoresResponse {
    pub candles: usize,
    pub rows: Vec<EnrichedRow>,
}

#[derive(Debug, Deserialize)]
pub struct DecisionHttpRequest {
    pub symbol: String,
    pub candles: Vec<Candle>,
    /// Per-request override of the deployment thresholds.
    #[serde(default)]
    pub thresholds: Option<ThresholdConfig>,
}

#[derive(Debug, Serialize)]
pub struct DecisionHttpResponse {
    pub symbol: String,
    pub decision: Decision,
    pub row: Option<EnrichedRow>,
}

/// Enrich a candle series with indicators and scores
async fn compute_scores(
    State(state): State<AppState>,
    Json(request): Json<ScoresRequest>,
) -> Result<Json<ScoresResponse>, StatusCode> {
    let mut rows = state.engine.run(&request.candles);
    if request.latest_only {
        rows = rows.pop().into_iter().collect();
    }
    Ok(Json(ScoresResponse {
        candles: request.candles.len(),
        rows,
    }))
}

/// Decide BUY/SELL/WAIT for the latest candle of a series
async fn decide(
    State(state): State<AppState>,
    Json(request): Json<DecisionHttpRequest>,
) -> Result<Json<DecisionHttpResponse>, StatusCode> {
    let pipeline = match request.thresholds {
        Some(thresholds) => state.pipeline.with_thresholds(thresholds).map_err(|e| {
            warn!(error = %e, symbol = %request.symbol, "Rejected threshold override");
            StatusCode::BAD_REQUEST
        })?,
        None => (*state.pipeline).clone(),
    };

    let (row, decision) = pipeline
        .decide_latest(&state.engine, &request.candles)
        .await
        .map_err(|e| {
            error!(error = %e, symbol = %request.symbol, "Decision pipeline precondition failed");
            match e {
                PipelineError::InvalidThresholds(_) => StatusCode::BAD_REQUEST,
                PipelineError::NonFiniteIndicator { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            }
        })?;

    state.metrics.record_decision(&decision);
    info!(
        symbol = %request.symbol,
        action = %decision.action,
        source = decision.source.label(),
        reason = %decision.reason,
        "Decision for {}: {}",
        request.symbol,
        decision.action
    );

    Ok(Json(DecisionHttpResponse {
        symbol: request.symbol,
        decision,
        row,
    }))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/scores", post(compute_scores))
        .route("/api/decisions", post(decide))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(port: u16, state: AppState) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port = port, "HTTP server listening on port {}", port);
    info!(
        "Metrics endpoint available at http://0.0.0.0:{}/metrics",
        port
    );
    axum::serve(listener, app).await?;

    Ok(())
}
