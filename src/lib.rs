//! Trendgate: OHLCV scoring engine and gated decision pipeline.
//!
//! Candles flow through the [`signals::engine::ScoreEngine`], which attaches
//! indicators and bull/bear scores to every fully warmed-up candle. The latest
//! row is then handed to [`pipeline::DecisionPipeline`], which runs the hard
//! gates and, when they all pass, consults the AI oracle for BUY/SELL/WAIT.

pub mod common;
pub mod config;
pub mod core;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod signals;
