//! Mock provider implementation for testing.
//!
//! [`MockProvider`] returns predefined replies in sequence, cycling through
//! them, and records every request it receives. Useful for exercising the
//! generation pipeline without making real API calls.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::chat::{ChatProvider, ChatRequest, ChatResponse};
use crate::llms::LlmError;
use crate::message::Message;

/// One scripted reply.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Reply with this text content.
    Text(String),
    /// Reply successfully but without any text content.
    NoContent,
    /// Fail the call with this error.
    Fail(LlmError),
}

impl From<&str> for MockReply {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for MockReply {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// A scripted provider for tests and offline runs.
///
/// # Example
///
/// ```rust,ignore
/// use chartgen::prelude::*;
///
/// let provider = MockProvider::new(vec![r#"{"rows": []}"#.into()]);
/// ```
#[derive(Debug)]
pub struct MockProvider {
    model_id: String,
    replies: Vec<MockReply>,
    reply_index: AtomicUsize,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockProvider {
    /// Create a new mock provider with predefined replies.
    #[must_use]
    pub fn new(replies: Vec<MockReply>) -> Self {
        Self {
            model_id: "mock-model".to_owned(),
            replies,
            reply_index: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock provider that always answers with `text`.
    #[must_use]
    pub fn with_text(text: impl Into<String>) -> Self {
        Self::new(vec![MockReply::Text(text.into())])
    }

    /// Create a mock provider with a custom model ID.
    #[must_use]
    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    /// Number of requests received so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Copies of every request received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl ChatProvider for MockProvider {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        if self.replies.is_empty() {
            return Err(LlmError::internal("mock provider has no scripted replies"));
        }

        let index = self.reply_index.fetch_add(1, Ordering::SeqCst);
        match &self.replies[index % self.replies.len()] {
            MockReply::Text(text) => {
                Ok(ChatResponse::from_text(text.clone()).with_model(self.model_id.clone()))
            }
            MockReply::NoContent => Ok(ChatResponse::new(Message::default())),
            MockReply::Fail(err) => Err(err.clone()),
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn default_model(&self) -> &str {
        &self.model_id
    }

    fn supports_json_schema(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_provider_cycles_replies() {
        let provider = MockProvider::new(vec!["first".into(), "second".into()]);
        let request = ChatRequest::new("m").user("hi");

        let r1 = provider.chat(&request).await.expect("chat should succeed");
        assert_eq!(r1.text().as_deref(), Some("first"));

        let r2 = provider.chat(&request).await.expect("chat should succeed");
        assert_eq!(r2.text().as_deref(), Some("second"));

        let r3 = provider.chat(&request).await.expect("chat should succeed");
        assert_eq!(r3.text().as_deref(), Some("first"));

        assert_eq!(provider.call_count(), 3);
        assert_eq!(provider.requests()[0], request);
    }

    #[tokio::test]
    async fn test_mock_provider_scripted_failure() {
        let provider = MockProvider::new(vec![MockReply::Fail(LlmError::network("offline"))]);
        let err = provider
            .chat(&ChatRequest::new("m"))
            .await
            .expect_err("scripted failure");
        assert_eq!(err.to_string(), "offline");
    }

    #[test]
    fn test_mock_provider_custom_id() {
        let provider = MockProvider::with_text("x").with_model_id("custom-mock");
        assert_eq!(provider.default_model(), "custom-mock");
        assert_eq!(provider.provider_name(), "mock");
    }
}
