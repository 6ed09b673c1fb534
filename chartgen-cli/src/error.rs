//! Error type for the chartgen CLI.

use chartgen::GenerationError;

use crate::config::ConfigError;

/// Error type for CLI commands.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration could not be loaded or is invalid.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Library error: missing credential, bad reply, or drawing failure.
    #[error(transparent)]
    Chart(#[from] chartgen::Error),

    /// The generation attempt ended in the failed state.
    #[error("{0}")]
    Failed(String),

    /// JSON output could not be produced.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<GenerationError> for CliError {
    fn from(err: GenerationError) -> Self {
        Self::Chart(err.into())
    }
}

/// Result type for CLI commands.
pub type Result<T> = std::result::Result<T, CliError>;
