//! One-shot evaluation of a candle file.
//!
//! Usage: `evaluate <candles.json>` where the file holds a JSON array of
//! `{timestamp, open, high, low, close, volume}` records. Without oracle
//! credentials the gates still run and eligible candles resolve to WAIT.

use dotenvy::dotenv;
use std::env;
use std::fs;
use std::sync::Arc;
use tracing::{info, warn};
use trendgate::config::{OracleConfig, ScoreConfig, ThresholdConfig};
use trendgate::logging;
use trendgate::models::indicators::Candle;
use trendgate::pipeline::{DecisionPipeline, OracleConsultant, OraclePool, RetryPolicy};
use trendgate::services::build_pool;
use trendgate::signals::ScoreEngine;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let path = env::args()
        .nth(1)
        .ok_or("usage: evaluate <candles.json>")?;
    let candles: Vec<Candle> = serde_json::from_str(&fs::read_to_string(&path)?)?;
    info!(path = %path, count = candles.len(), "Loaded candles");

    let (pool, policy) = match OracleConfig::from_env() {
        Ok(config) => {
            let policy = RetryPolicy {
                timeout: config.timeout,
                initial_delay: config.retry_delay,
                ..RetryPolicy::default()
            };
            (build_pool(&config)?, policy)
        }
        Err(e) => {
            warn!(error = %e, "No oracle credentials, continuing with gates only");
            (OraclePool::new(Vec::new()), RetryPolicy::default())
        }
    };

    let consultant = Arc::new(OracleConsultant::new(Arc::new(pool), policy));
    let pipeline = DecisionPipeline::new(ThresholdConfig::from_env()?, consultant)?;
    let engine = ScoreEngine::new(ScoreConfig::from_env()?);

    let (row, decision) = pipeline.decide_latest(&engine, &candles).await?;

    if let Some(row) = &row {
        let ind = &row.indicators;
        println!("Candle: {}  close {:.4}", row.candle.timestamp, row.candle.close);
        println!(
            "  RSI {:.1}  ADX {:.1}  RVOL {:.2}  EMA200 {:.2} ({:+.2}%)  MACD hist {:.4}",
            ind.rsi, ind.adx, ind.rvol, ind.ema_200, ind.ema_dist, ind.macd_histogram
        );
        println!(
            "  Bull {:.1}  Bear {:.1}  regime {:?}",
            row.scores.score_bull, row.scores.score_bear, row.scores.regime
        );
    }
    println!("Decision: {} ({})", decision.action, decision.source.label());
    println!("  Reason: {}", decision.reason);

    Ok(())
}
