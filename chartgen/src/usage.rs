//! Token usage reported by a generation endpoint.
//!
//! The `Usage` struct aligns with OpenAI's usage object
//! (`prompt_tokens` / `completion_tokens` / `total_tokens`).

use serde::{Deserialize, Serialize};

/// Token usage statistics from a single model call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Number of tokens in the input/prompt.
    #[serde(default, alias = "prompt_tokens")]
    pub input_tokens: u32,

    /// Number of tokens in the output/completion.
    #[serde(default, alias = "completion_tokens")]
    pub output_tokens: u32,

    /// Total tokens used (input + output).
    #[serde(default)]
    pub total_tokens: u32,
}

impl Usage {
    /// Create a new usage record.
    #[must_use]
    pub const fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens: input_tokens + output_tokens,
        }
    }

    /// Check if usage is empty (no tokens used).
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total_tokens == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_openai_field_names() {
        let usage: Usage = serde_json::from_str(
            r#"{"prompt_tokens": 100, "completion_tokens": 50, "total_tokens": 150}"#,
        )
        .unwrap_or_default();
        assert_eq!(usage, Usage::new(100, 50));
        assert!(!usage.is_empty());
    }

    #[test]
    fn default_is_empty() {
        assert!(Usage::default().is_empty());
    }
}
