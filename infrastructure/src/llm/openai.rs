//! OpenAI-compatible chat completion gateway
//!
//! POST {base_url}/chat/completions
//! Headers:
//!   Authorization: Bearer {api_key}
//!   content-type: application/json

use crate::config::FileLlmConfig;
use async_trait::async_trait;
use seeker_application::{Completion, CompletionRequest, GatewayError, LlmGateway};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, warn};

/// [`LlmGateway`] backed by any OpenAI-compatible `/chat/completions` endpoint
pub struct OpenAiGateway {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiGateway {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: Self::build_client(Duration::from_secs(60)),
            base_url: base_url.into(),
            api_key,
            model: model.into(),
            temperature: 0.2,
            max_tokens: 1024,
        }
    }

    /// Gateway configured from the `[llm]` section.
    ///
    /// The HTTP client timeout sits just above the per-call timeout so the
    /// workflow's own bound fires first.
    pub fn from_config(config: &FileLlmConfig) -> Self {
        let timeout = Duration::from_secs(config.timeout_seconds.saturating_add(5));
        Self {
            client: Self::build_client(timeout),
            base_url: config.base_url.clone(),
            api_key: config.resolve_api_key(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn build_client(timeout: Duration) -> reqwest::Client {
        reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new())
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    fn request_body(&self, request: &CompletionRequest) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": [
                { "role": "user", "content": request.prompt }
            ],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        });
        if request.structured {
            body["response_format"] = json!({ "type": "json_object" });
        }
        body
    }
}

/// Text of the first choice of a chat completion response
fn extract_content(body: &Value) -> Result<String, GatewayError> {
    body.get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| GatewayError::InvalidResponse("missing choices[0].message.content".to_string()))
}

#[async_trait]
impl LlmGateway for OpenAiGateway {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn invoke(&self, request: &CompletionRequest) -> Result<Completion, GatewayError> {
        let url = self.endpoint();
        debug!(model = %self.model, structured = request.structured, "Calling chat completion API");

        let mut builder = self.client.post(&url).json(&self.request_body(request));
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                GatewayError::Timeout
            } else if e.is_connect() {
                GatewayError::ConnectionError(e.to_string())
            } else {
                GatewayError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| GatewayError::RequestFailed(format!("Failed to read response body: {e}")))?;

        if !status.is_success() {
            warn!(%status, "Chat completion API returned an error");
            return Err(GatewayError::RequestFailed(format!(
                "API returned {status}: {response_text}"
            )));
        }

        let body: Value = serde_json::from_str(&response_text)
            .map_err(|e| GatewayError::InvalidResponse(format!("Failed to parse response JSON: {e}")))?;
        let content = extract_content(&body)?;
        debug!(chars = content.len(), "Chat completion received");
        Ok(Completion { content })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let gateway = OpenAiGateway::new("http://localhost:8080/v1/", "gpt-4o-mini", None);
        assert_eq!(gateway.endpoint(), "http://localhost:8080/v1/chat/completions");
        assert!(!gateway.has_api_key());
    }

    #[test]
    fn test_structured_request_asks_for_json() {
        let gateway = OpenAiGateway::new("http://x", "m", None).with_temperature(0.0);
        let body = gateway.request_body(&CompletionRequest::structured("route this"));
        assert_eq!(body["response_format"]["type"], "json_object");
        assert_eq!(body["messages"][0]["content"], "route this");
        assert_eq!(body["temperature"], 0.0);

        let text = gateway.request_body(&CompletionRequest::text("explain"));
        assert!(text.get("response_format").is_none());
    }

    #[test]
    fn test_from_config() {
        let config = FileLlmConfig {
            api_key: Some("sk-test".to_string()),
            model: "gpt-4o".to_string(),
            ..Default::default()
        };
        let gateway = OpenAiGateway::from_config(&config);
        assert_eq!(gateway.model_name(), "gpt-4o");
        assert!(gateway.has_api_key());
    }

    #[test]
    fn test_extract_content() {
        let body = json!({"choices": [{"message": {"role": "assistant", "content": "{\"next_node\":\"general_agent\"}"}}]});
        assert_eq!(extract_content(&body).unwrap(), "{\"next_node\":\"general_agent\"}");

        let empty = json!({"choices": []});
        assert!(matches!(extract_content(&empty), Err(GatewayError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_an_error() {
        let gateway = OpenAiGateway::new("http://127.0.0.1:9", "m", None);
        let result = gateway.invoke(&CompletionRequest::text("hi")).await;
        assert!(result.is_err());
    }
}
