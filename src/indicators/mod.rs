//! Per-indicator series calculators.
//!
//! Every calculator takes the full candle series and returns one
//! `Option<f64>` per candle, `None` inside that indicator's warm-up window.

pub mod momentum;
pub mod trend;
pub mod volatility;
pub mod volume;

pub use momentum::*;
pub use trend::*;
pub use volatility::*;
pub use volume::*;
