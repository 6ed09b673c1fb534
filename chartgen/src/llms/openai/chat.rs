//! OpenAI `ChatProvider` implementation.

use async_trait::async_trait;
use tracing::debug;

use crate::chat::{ChatProvider, ChatRequest, ChatResponse, StopReason};
use crate::llms::LlmError;
use crate::message::Message;

use super::client::OpenAI;
use super::types::OpenAIChatResponse;

impl OpenAI {
    /// Parse the response into `ChatResponse`.
    pub(crate) fn parse_response(response: OpenAIChatResponse) -> Result<ChatResponse, LlmError> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::response_format("at least one choice", "empty choices"))?;

        if let Some(refusal) = choice.message.refusal {
            return Err(LlmError::provider_code("openai", "refusal", refusal));
        }

        let stop_reason = choice
            .finish_reason
            .as_deref()
            .map_or(StopReason::Stop, StopReason::parse);

        let message = Message {
            role: crate::message::Role::Assistant,
            content: choice.message.content,
        };

        let mut chat = ChatResponse::new(message).with_stop_reason(stop_reason);
        if let Some(usage) = response.usage {
            chat = chat.with_usage(usage);
        }
        if !response.model.is_empty() {
            chat = chat.with_model(response.model);
        }
        Ok(chat)
    }
}

#[async_trait]
impl ChatProvider for OpenAI {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError> {
        let url = self.chat_url();
        let body = self.build_body(request);
        debug!(url = %url, model = %body.model, "sending chat completion request");

        let response = self.build_request(&url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Self::parse_error(status.as_u16(), &error_text));
        }

        let response_text = response.text().await?;
        let parsed: OpenAIChatResponse = serde_json::from_str(&response_text).map_err(|e| {
            LlmError::response_format(
                "valid OpenAI response",
                format!("parse error: {e}, response: {response_text}"),
            )
        })?;

        Self::parse_response(parsed)
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn default_model(&self) -> &str {
        self.model()
    }

    fn supports_json_schema(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(json: &str) -> OpenAIChatResponse {
        serde_json::from_str(json).expect("envelope should deserialize")
    }

    #[test]
    fn test_parse_response_text_and_stop_reason() {
        let parsed = OpenAI::parse_response(envelope(
            r#"{"id":"c1","model":"gpt-4o-mini","choices":[{"message":{"content":"{\"rows\":[]}"},"finish_reason":"length"}]}"#,
        ))
        .expect("response should parse");

        assert_eq!(parsed.text().as_deref(), Some(r#"{"rows":[]}"#));
        assert_eq!(parsed.stop_reason, StopReason::Length);
        assert_eq!(parsed.model.as_deref(), Some("gpt-4o-mini"));
    }

    #[test]
    fn test_parse_response_without_choices() {
        let err = OpenAI::parse_response(envelope(r#"{"choices":[]}"#))
            .expect_err("empty choices must fail");
        assert!(matches!(err, LlmError::ResponseFormat { .. }));
    }

    #[test]
    fn test_parse_response_refusal() {
        let err = OpenAI::parse_response(envelope(
            r#"{"choices":[{"message":{"content":null,"refusal":"I can't help"},"finish_reason":"stop"}]}"#,
        ))
        .expect_err("refusal must fail");
        assert!(err.to_string().contains("I can't help"));
    }
}
