//! Failure taxonomy of a chart generation call.

use crate::llms::LlmError;

/// Why a generation attempt produced no chart.
///
/// Callers that only need to tell success from failure can use
/// [`GenerationError::user_message`]; every variant carries its cause.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum GenerationError {
    /// The process is not set up to reach the generation endpoint.
    #[error("Configuration error: {0}")]
    Configuration(#[source] LlmError),

    /// The call to the model could not complete.
    #[error("Failed to communicate with the AI model: {0}")]
    Transport(#[source] LlmError),

    /// The model answered with blank text.
    #[error("The AI model returned an empty response.")]
    EmptyResponse,

    /// The reply text is not valid JSON.
    #[error("The AI model returned malformed JSON: {0}")]
    MalformedResponse(String),

    /// The reply parsed but does not have the expected shape.
    #[error("The AI response did not match the expected shape: {0}")]
    SchemaViolation(String),
}

impl GenerationError {
    /// Create a schema violation error.
    #[must_use]
    pub fn schema_violation(msg: impl Into<String>) -> Self {
        Self::SchemaViolation(msg.into())
    }

    /// Single user-facing failure message including the cause.
    #[must_use]
    pub fn user_message(&self) -> String {
        format!("Failed to generate chart. {self}")
    }

    /// Returns `true` when re-submitting cannot help until configuration changes.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

impl From<LlmError> for GenerationError {
    fn from(err: LlmError) -> Self {
        Self::Transport(err)
    }
}
