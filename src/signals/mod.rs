//! Signal derivation: directional votes, weights and the score engine.

pub mod engine;
pub mod scoring;

pub use engine::ScoreEngine;
pub use scoring::*;
