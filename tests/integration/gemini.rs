//! Integration tests for the Gemini oracle client against a mocked API.

use std::sync::Arc;
use std::time::Duration;

use chrono::DateTime;
use serde_json::json;
use trendgate::config::{OracleConfig, ThresholdConfig};
use trendgate::models::indicators::{Candle, EnrichedRow, IndicatorSet};
use trendgate::models::signal::{Action, DecisionSource, Regime, ScoreRow, SignalWeights};
use trendgate::pipeline::{
    DecisionRequest, OracleClient, OracleConsultant, OracleError, RetryPolicy,
};
use trendgate::services::{build_pool, GeminiClient};
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn request() -> DecisionRequest {
    let row = EnrichedRow {
        candle: Candle::new(
            100.5,
            101.5,
            99.5,
            100.5,
            1500.0,
            DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        ),
        indicators: IndicatorSet {
            rsi: 50.0,
            macd_histogram: 0.1,
            ema_200: 100.0,
            vwap: 99.5,
            atr: 1.2,
            adx: 30.0,
            volume_sma: 1000.0,
            rvol: 1.5,
            ema_dist: 0.5,
        },
        scores: ScoreRow {
            score_bull: 70.0,
            score_bear: 40.0,
            regime: Regime::Trending,
            weights: SignalWeights {
                trend: 2.0,
                oscillator: 0.5,
                base: 1.0,
            },
        },
    };
    DecisionRequest::build(&row, &ThresholdConfig::default())
}

fn reply_body(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }]
    })
}

fn client(server: &MockServer, key: &str, model: Option<&str>) -> GeminiClient {
    GeminiClient::new(
        &server.uri(),
        key,
        model.map(str::to_string),
        Duration::from_secs(5),
    )
    .unwrap()
}

#[tokio::test]
async fn configured_model_calls_generate_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
        .and(query_param("key", "key-one"))
        .and(body_string_contains("Market context"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply_body(
            "```json\n{\"action\": \"BUY\", \"reason\": \"trend\"}\n```",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let gemini = client(&server, "key-one", Some("gemini-1.5-flash"));
    let raw = gemini.ask(&request()).await.unwrap();

    assert!(raw.contains("\"BUY\""));
    assert_eq!(gemini.name(), "gemini:key-…");
}

#[tokio::test]
async fn discovers_flash_model_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1beta/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "models": [
                { "name": "models/embedding-001", "supportedGenerationMethods": ["embedContent"] },
                { "name": "models/gemini-pro", "supportedGenerationMethods": ["generateContent"] },
                {
                    "name": "models/gemini-2.0-flash",
                    "supportedGenerationMethods": ["generateContent"]
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply_body(
            "{\"action\": \"WAIT\", \"reason\": \"no edge\"}",
        )))
        .expect(2)
        .mount(&server)
        .await;

    let gemini = client(&server, "key-one", None);
    gemini.ask(&request()).await.unwrap();
    gemini.ask(&request()).await.unwrap();

    assert_eq!(gemini.model().await.unwrap(), "gemini-2.0-flash");
}

#[tokio::test]
async fn discovery_without_usable_model_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1beta/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "models": [
                { "name": "models/embedding-001", "supportedGenerationMethods": ["embedContent"] }
            ]
        })))
        .mount(&server)
        .await;

    let gemini = client(&server, "key-one", None);
    assert!(matches!(gemini.ask(&request()).await, Err(OracleError::NoModel)));
}

#[tokio::test]
async fn rejected_key_maps_to_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-pro:generateContent"))
        .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
        .mount(&server)
        .await;

    let gemini = client(&server, "bad", Some("gemini-pro"));
    assert!(matches!(
        gemini.ask(&request()).await,
        Err(OracleError::Unauthorized(403))
    ));
}

#[tokio::test]
async fn server_error_maps_to_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-pro:generateContent"))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
        .mount(&server)
        .await;

    let gemini = client(&server, "key-one", Some("gemini-pro"));
    match gemini.ask(&request()).await {
        Err(OracleError::Status { status, body }) => {
            assert_eq!(status, 429);
            assert!(body.contains("quota"));
        }
        other => panic!("expected status error, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn pool_fails_over_to_working_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-pro:generateContent"))
        .and(query_param("key", "bad-key"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-pro:generateContent"))
        .and(query_param("key", "good-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply_body(
            "{\"action\": \"SELL\", \"reason\": \"fading momentum\"}",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let config = OracleConfig {
        api_keys: vec!["bad-key".to_string(), "good-key".to_string()],
        model: Some("gemini-pro".to_string()),
        base_url: server.uri(),
        ..OracleConfig::default()
    };
    let pool = Arc::new(build_pool(&config).unwrap());
    let consultant = OracleConsultant::new(
        pool,
        RetryPolicy {
            timeout: Duration::from_secs(5),
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
        },
    );

    let decision = consultant.consult(&request()).await;

    assert_eq!(decision.action, Action::Sell);
    assert_eq!(decision.reason, "fading momentum");
    assert_eq!(
        decision.source,
        DecisionSource::Oracle {
            credential: "gemini:good…".to_string()
        }
    );
}
