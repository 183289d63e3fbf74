//! External collaborators.

pub mod gemini;

pub use gemini::{build_pool, GeminiClient};
