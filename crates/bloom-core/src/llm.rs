//! Completion models: the prompt -> choices interface used by the report builder,
//! an HTTP client for OpenAI-compatible `/v1/completions` servers, and a mock.

use crate::config::{GatewayConfig, LlmMode};
use crate::error::LlmError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

const COMPLETIONS_PATH: &str = "/v1/completions";
const MOCK_REPLY: &str = "Mock completion: no language model is configured for this gateway.";

/// Model response. Only the generated text of each choice is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionChoice {
    #[serde(default)]
    pub text: String,
}

impl Completion {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            choices: vec![CompletionChoice { text: text.into() }],
        }
    }

    pub fn first_text(&self) -> Option<&str> {
        self.choices.first().map(|c| c.text.as_str())
    }
}

/// Anything that turns a prompt and a token budget into a completion.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<Completion, LlmError>;
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
}

/// Client for an OpenAI-compatible completions endpoint (e.g. a local llama.cpp server running TinyLlama).
pub struct CompletionClient {
    base_url: String,
    model: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl CompletionClient {
    pub fn new(base_url: &str, model: &str) -> Self {
        Self::with_timeout(base_url, model, Duration::from_secs(60))
    }

    pub fn with_timeout(base_url: &str, model: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: None,
            client,
        }
    }

    pub fn from_config(cfg: &GatewayConfig) -> Self {
        let client = Self::with_timeout(
            &cfg.llm_api_url,
            &cfg.llm_model,
            Duration::from_secs(cfg.llm_timeout_secs),
        );
        match cfg.api_key() {
            Some(key) => client.with_api_key(key),
            None => client,
        }
    }

    pub fn with_api_key(mut self, key: &str) -> Self {
        self.api_key = Some(key.trim().to_string());
        self
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, COMPLETIONS_PATH)
    }
}

#[async_trait]
impl CompletionModel for CompletionClient {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<Completion, LlmError> {
        let body = CompletionRequest {
            model: &self.model,
            prompt,
            max_tokens,
        };

        tracing::debug!(
            "[LLM] POST {} (model: {}, max_tokens: {})",
            self.endpoint(),
            self.model,
            max_tokens
        );

        let mut req = self.client.post(self.endpoint()).json(&body);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }
        let res = req.send().await?;

        let status = res.status();
        let text = res.text().await?;

        if !status.is_success() {
            tracing::warn!("[LLM] HTTP {} from completion server", status);
            return Err(LlmError::Api(status.as_u16(), text));
        }

        serde_json::from_str(&text).map_err(|e| LlmError::Parse(e.to_string()))
    }
}

/// Returns the same reply for every prompt.
pub struct MockCompletionModel {
    reply: String,
}

impl MockCompletionModel {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
        }
    }
}

impl Default for MockCompletionModel {
    fn default() -> Self {
        Self::new(MOCK_REPLY)
    }
}

#[async_trait]
impl CompletionModel for MockCompletionModel {
    async fn complete(&self, _prompt: &str, max_tokens: u32) -> Result<Completion, LlmError> {
        tracing::debug!("[LLM] mock completion (max_tokens: {})", max_tokens);
        Ok(Completion::from_text(self.reply.clone()))
    }
}

/// Picks the completion model for the configured mode.
pub fn model_from_config(cfg: &GatewayConfig) -> Arc<dyn CompletionModel> {
    match cfg.llm_mode() {
        LlmMode::Live => {
            let client = CompletionClient::from_config(cfg);
            tracing::info!("[LLM] live mode: {}", client.endpoint());
            Arc::new(client)
        }
        LlmMode::Mock => {
            tracing::info!("[LLM] mock mode: canned completions");
            Arc::new(MockCompletionModel::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_strips_trailing_slash() {
        let client = CompletionClient::new("http://127.0.0.1:8080/", "tinyllama");
        assert_eq!(client.endpoint(), "http://127.0.0.1:8080/v1/completions");
    }

    #[test]
    fn request_body_shape() {
        let body = CompletionRequest {
            model: "tinyllama",
            prompt: "hello",
            max_tokens: 200,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "model": "tinyllama", "prompt": "hello", "max_tokens": 200 })
        );
    }

    #[test]
    fn parses_llama_cpp_style_response() {
        let raw = r#"{
            "id": "cmpl-1",
            "object": "text_completion",
            "choices": [{ "text": "  Staff were praised. ", "index": 0, "finish_reason": "stop" }],
            "usage": { "prompt_tokens": 10, "completion_tokens": 4 }
        }"#;
        let parsed: Completion = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.first_text(), Some("  Staff were praised. "));
    }

    #[test]
    fn missing_choices_parses_as_empty() {
        let parsed: Completion = serde_json::from_str("{}").unwrap();
        assert!(parsed.first_text().is_none());
    }

    #[tokio::test]
    async fn mock_returns_reply() {
        let model = MockCompletionModel::new("canned");
        let out = model.complete("anything", 10).await.unwrap();
        assert_eq!(out, Completion::from_text("canned"));
    }

    #[tokio::test]
    async fn unreachable_server_is_request_error() {
        let client = CompletionClient::with_timeout("http://127.0.0.1:1", "m", Duration::from_secs(2));
        let err = client.complete("p", 5).await.unwrap_err();
        assert!(matches!(err, LlmError::Request(_)));
    }

    #[tokio::test]
    async fn model_from_config_mock_mode_gives_canned_reply() {
        let model = model_from_config(&GatewayConfig::default());
        let out = model.complete("prompt", 200).await.unwrap();
        assert_eq!(out.first_text(), Some(MOCK_REPLY));
    }

    #[tokio::test]
    async fn model_from_config_live_mode_calls_configured_server() {
        let cfg = GatewayConfig {
            llm_mode: "live".to_string(),
            llm_api_url: "http://127.0.0.1:1".to_string(),
            llm_timeout_secs: 2,
            ..GatewayConfig::default()
        };
        let err = model_from_config(&cfg).complete("prompt", 200).await.unwrap_err();
        assert!(matches!(err, LlmError::Request(_)));
    }

    #[test]
    fn from_config_applies_api_key_and_url() {
        let cfg = GatewayConfig {
            llm_mode: "live".to_string(),
            llm_api_key: Some("k".to_string()),
            ..GatewayConfig::default()
        };
        let client = CompletionClient::from_config(&cfg);
        assert_eq!(client.api_key.as_deref(), Some("k"));
        assert_eq!(client.endpoint(), "http://127.0.0.1:8080/v1/completions");
    }
}
