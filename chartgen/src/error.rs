//! Unified error types for the chartgen crate.
//!
//! This module ties together:
//! - Model backend errors ([`LlmError`])
//! - Chart generation errors ([`GenerationError`])
//! - Rendering failures

pub use crate::generation::GenerationError;
pub use crate::llms::LlmError;

/// Result type alias for chartgen operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the chartgen crate.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Model backend error.
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// Chart data generation error.
    #[error("{0}")]
    Generation(#[from] GenerationError),

    /// Drawing the chart failed.
    #[error("Render error: {0}")]
    Render(String),
}

impl Error {
    /// Create a render error with a message.
    #[must_use]
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}
