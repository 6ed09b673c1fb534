//! Chart data generation against a structured-output model endpoint.
//!
//! [`ChartGenerator`] turns a topic and chart kind into a validated
//! [`GenerationResult`]: it builds the request, performs exactly one model
//! call, and checks the reply before handing it back.
//!
//! ```rust,ignore
//! use chartgen::prelude::*;
//!
//! let generator = ChartGenerator::from_env()?;
//! let topic = Topic::new("Monthly coffee sales")?;
//! let result = generator.generate(&topic, ChartKind::Bar).await?;
//! ```

mod error;
mod validate;

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::chart::{ChartKind, GenerationResult, Topic};
use crate::chat::{ChatProvider, SharedChatProvider, StopReason};
use crate::llms::{OpenAI, OpenAIConfig};
use crate::request;

pub use error::GenerationError;
pub use validate::{parse_reply, validate_reply};

/// Generates chart data through a [`ChatProvider`].
///
/// Cheap to clone; clones share the provider.
#[derive(Clone)]
pub struct ChartGenerator {
    provider: SharedChatProvider,
    model: Option<String>,
    temperature: Option<f32>,
}

impl fmt::Debug for ChartGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChartGenerator")
            .field("provider", &self.provider.provider_name())
            .field("model", &self.model())
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl ChartGenerator {
    /// Create a generator backed by `provider`.
    #[must_use]
    pub fn new(provider: impl ChatProvider + 'static) -> Self {
        Self::from_shared(Arc::new(provider))
    }

    /// Create a generator from an already shared provider.
    #[must_use]
    pub fn from_shared(provider: SharedChatProvider) -> Self {
        Self {
            provider,
            model: None,
            temperature: None,
        }
    }

    /// Create an OpenAI-compatible generator from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Configuration`] when the credential is
    /// missing or the HTTP client cannot be built.
    pub fn openai(config: OpenAIConfig) -> Result<Self, GenerationError> {
        let client = OpenAI::new(config).map_err(GenerationError::Configuration)?;
        Ok(Self::new(client))
    }

    /// Create an OpenAI-compatible generator from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Configuration`] when `OPENAI_API_KEY` is
    /// unset or blank.
    pub fn from_env() -> Result<Self, GenerationError> {
        let client = OpenAI::from_env().map_err(GenerationError::Configuration)?;
        Ok(Self::new(client))
    }

    /// Override the provider's default model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        let model = model.into();
        self.model = (!model.trim().is_empty()).then_some(model);
        self
    }

    /// Set the sampling temperature sent with every request.
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Model identifier used for requests.
    #[must_use]
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }

    /// Name of the backing provider.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.provider.provider_name()
    }

    /// Generate chart data for `topic` rendered as `kind`.
    ///
    /// Performs exactly one model call and no retries.
    ///
    /// # Errors
    ///
    /// - [`GenerationError::Transport`] when the call does not complete
    /// - [`GenerationError::EmptyResponse`] for a blank reply
    /// - [`GenerationError::MalformedResponse`] for a reply that is not JSON
    /// - [`GenerationError::SchemaViolation`] for a reply of the wrong shape
    pub async fn generate(
        &self,
        topic: &Topic,
        kind: ChartKind,
    ) -> Result<GenerationResult, GenerationError> {
        let model = self.model().to_owned();
        let mut chat = request::build(topic, kind).into_chat_request(model.as_str());
        if let Some(temperature) = self.temperature {
            chat = chat.temperature(temperature);
        }

        info!(
            provider = self.provider.provider_name(),
            model = %model,
            kind = %kind,
            topic = %topic,
            "Requesting chart data"
        );
        if !self.provider.supports_json_schema() {
            warn!(
                provider = self.provider.provider_name(),
                "Provider ignores response schemas; the reply is validated locally only"
            );
        }

        let response = self.provider.chat(&chat).await.map_err(|e| {
            warn!(provider = self.provider.provider_name(), error = %e, "Chart data request failed");
            GenerationError::Transport(e)
        })?;

        if let Some(usage) = response.usage {
            debug!(
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "Chart data usage"
            );
        }
        match response.stop_reason {
            StopReason::Length => {
                warn!(kind = %kind, "Model reply was truncated by the token limit");
            }
            StopReason::ContentFilter => {
                warn!(kind = %kind, "Model reply was cut short by a content filter");
            }
            StopReason::Stop => {}
        }

        let text = response.text().unwrap_or_default();
        let result = parse_reply(kind, &text).inspect_err(|e| {
            warn!(kind = %kind, error = %e, "Rejected model reply");
        })?;

        info!(
            kind = %kind,
            rows = result.rows.len(),
            series = result.series_keys().len(),
            "Chart data generated"
        );
        Ok(result)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::chart::VALUE_FIELD;
    use crate::chat::ChatResponse;
    use crate::llms::{LlmError, MockProvider, MockReply};
    use crate::message::Message;

    const PIE_REPLY: &str = r##"{"rows": [
        {"name": "Chrome", "value": 65, "fill": "#34d399"},
        {"name": "Safari", "value": 19, "fill": "#60a5fa"},
        {"name": "Edge", "value": 16, "fill": "#f87171"}
    ]}"##;

    fn topic(text: &str) -> Topic {
        Topic::new(text).unwrap()
    }

    #[tokio::test]
    async fn generates_validated_pie_data() {
        let provider = Arc::new(MockProvider::with_text(PIE_REPLY));
        let shared = Arc::clone(&provider);
        let generator = ChartGenerator::from_shared(shared);

        let result = generator
            .generate(&topic("Browser market share"), ChartKind::Pie)
            .await
            .unwrap();

        assert_eq!(result.rows.len(), 3);
        assert_eq!(result.rows[0].value(VALUE_FIELD), Some(65.0));
        assert!(result.series_keys.is_none());
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn sends_schema_and_model() {
        let provider = Arc::new(MockProvider::with_text(PIE_REPLY));
        let shared = Arc::clone(&provider);
        let generator = ChartGenerator::from_shared(shared)
            .with_model("gpt-4o")
            .with_temperature(0.2);

        generator
            .generate(&topic("Browser market share"), ChartKind::Pie)
            .await
            .unwrap();

        let sent = provider.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].model, "gpt-4o");
        assert_eq!(sent[0].temperature, Some(0.2));
        assert!(sent[0].response_format.is_some());
    }

    #[test]
    fn blank_model_falls_back_to_provider_default() {
        let generator = ChartGenerator::new(MockProvider::with_text("{}")).with_model("  ");
        assert_eq!(generator.model(), "mock-model");
        assert_eq!(generator.provider_name(), "mock");
    }

    #[tokio::test]
    async fn transport_failure_is_reported() {
        let generator = ChartGenerator::new(MockProvider::new(vec![MockReply::Fail(
            LlmError::network("Connection refused"),
        )]));

        let err = generator
            .generate(&topic("Monthly coffee sales"), ChartKind::Bar)
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Transport(_)));
    }

    #[tokio::test]
    async fn missing_content_is_empty_response() {
        let generator = ChartGenerator::new(MockProvider::new(vec![MockReply::NoContent]));

        let err = generator
            .generate(&topic("Monthly coffee sales"), ChartKind::Line)
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::EmptyResponse));
    }

    #[tokio::test]
    async fn prose_reply_is_malformed() {
        let generator = ChartGenerator::new(MockProvider::with_text("I cannot help with that."));

        let err = generator
            .generate(&topic("Monthly coffee sales"), ChartKind::Bar)
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn truncated_reply_still_validated() {
        struct Truncated;

        #[async_trait::async_trait]
        impl ChatProvider for Truncated {
            async fn chat(
                &self,
                _request: &crate::chat::ChatRequest,
            ) -> Result<ChatResponse, LlmError> {
                Ok(ChatResponse::new(Message::assistant(r#"{"rows": [{"name": "Jan""#))
                    .with_stop_reason(StopReason::Length))
            }

            fn provider_name(&self) -> &'static str {
                "truncated"
            }

            fn default_model(&self) -> &str {
                "t"
            }
        }

        let err = ChartGenerator::new(Truncated)
            .generate(&topic("Monthly coffee sales"), ChartKind::Bar)
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::MalformedResponse(_)));
    }

    #[test]
    fn missing_credential_is_fatal_configuration_error() {
        let err = ChartGenerator::openai(OpenAIConfig::default()).unwrap_err();
        assert!(matches!(err, GenerationError::Configuration(_)));
        assert!(err.is_fatal());
    }

    #[tokio::test]
    async fn provider_without_schema_support_is_still_validated() {
        struct Unstructured;

        #[async_trait::async_trait]
        impl ChatProvider for Unstructured {
            async fn chat(
                &self,
                _request: &crate::chat::ChatRequest,
            ) -> Result<ChatResponse, LlmError> {
                Ok(ChatResponse::from_text(PIE_REPLY).with_stop_reason(StopReason::ContentFilter))
            }

            fn provider_name(&self) -> &'static str {
                "unstructured"
            }

            fn default_model(&self) -> &str {
                "u"
            }
        }

        assert!(!Unstructured.supports_json_schema());
        let result = ChartGenerator::new(Unstructured)
            .generate(&topic("Browser market share"), ChartKind::Pie)
            .await
            .unwrap();
        assert_eq!(result.rows.len(), 3);
    }
}
