//! HTTP LLM client
//!
//! Implements [`LlmClientPort`] over reqwest. Holds the current
//! [`LlmConfig`] snapshot behind a lock; each call copies it once, so a
//! `/model` switch never affects a request already in flight.

use std::sync::RwLock;

use async_trait::async_trait;
use shipwright_application::ports::llm_client::{LlmClientPort, LlmRequest, ProviderError};
use shipwright_domain::{LlmConfig, LlmResponse};
use tracing::debug;

use super::ProviderAdapter;
use crate::tools::JsonSchemaToolConverter;

pub struct HttpLlmClient {
    http: reqwest::Client,
    config: RwLock<LlmConfig>,
    schema: JsonSchemaToolConverter,
}

impl HttpLlmClient {
    pub fn new(config: LlmConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config: RwLock::new(config),
            schema: JsonSchemaToolConverter,
        }
    }

    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }
}

/// Credential lookup: the config's key, then the provider's environment
/// variable. Providers without a key requirement may still use one.
pub fn resolve_api_key(config: &LlmConfig) -> Result<Option<String>, ProviderError> {
    let configured = config
        .api_key
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string);
    if configured.is_some() {
        return Ok(configured);
    }

    let Some(env_var) = config.provider.api_key_env() else {
        return Ok(None);
    };
    match std::env::var(env_var) {
        Ok(key) if !key.trim().is_empty() => Ok(Some(key.trim().to_string())),
        _ if config.provider.requires_api_key() => Err(ProviderError::Auth {
            provider: config.provider.to_string(),
            env_var: env_var.to_string(),
        }),
        _ => Ok(None),
    }
}

#[async_trait]
impl LlmClientPort for HttpLlmClient {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, ProviderError> {
        let config = self.config();
        let adapter = ProviderAdapter::for_kind(config.provider);
        let api_key = resolve_api_key(&config)?;

        let url = adapter.endpoint(&config.effective_base_url());
        let body = adapter.normalize(&config, request, &self.schema);

        debug!(
            provider = %config.provider,
            model = %config.model,
            url = %url,
            messages = request.messages.len(),
            tools = request.tools.len(),
            "Calling LLM"
        );

        let builder = self.http.post(&url).json(&body);
        let response = adapter
            .authorize(builder, api_key.as_deref())
            .send()
            .await
            .map_err(|e| ProviderError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        let parsed = adapter.parse(&payload)?;
        debug!(
            stop_reason = %parsed.stop_reason,
            tool_calls = parsed.tool_calls().len(),
            "LLM responded"
        );
        Ok(parsed)
    }

    fn config(&self) -> LlmConfig {
        self.config
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn replace_config(&self, config: LlmConfig) {
        *self.config.write().unwrap_or_else(|e| e.into_inner()) = config;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shipwright_domain::{Message, ProviderKind, RiskLevel, StopReason, ToolDefinition};
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> LlmRequest {
        LlmRequest::new(vec![Message::user("Hi")]).with_system("You are terse.")
    }

    #[tokio::test]
    async fn test_anthropic_text_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "test-key"))
            .and(header("anthropic-version", "2023-06-01"))
            .and(body_partial_json(serde_json::json!({"system": "You are terse.", "max_tokens": 4096})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "model": "claude-test",
                "content": [{"type": "text", "text": "Hello!"}],
                "stop_reason": "end_turn"
            })))
            .mount(&server)
            .await;

        let client = HttpLlmClient::new(
            LlmConfig::new(ProviderKind::Anthropic)
                .with_model("claude-test")
                .with_api_key("test-key")
                .with_base_url(server.uri()),
        );

        let response = client.complete(&request()).await.unwrap();
        assert_eq!(response.text_content(), "Hello!");
        assert_eq!(response.stop_reason, StopReason::EndTurn);
        assert_eq!(response.model.as_deref(), Some("claude-test"));
    }

    #[tokio::test]
    async fn test_openai_compatible_tool_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(serde_json::json!({"tool_choice": "auto"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{
                    "message": {
                        "role": "assistant",
                        "content": null,
                        "tool_calls": [{
                            "id": "call_01",
                            "type": "function",
                            "function": {"name": "read_file", "arguments": "{\"path\":\"README.md\"}"}
                        }]
                    },
                    "finish_reason": "tool_calls"
                }]
            })))
            .mount(&server)
            .await;

        let client = HttpLlmClient::new(
            LlmConfig::new(ProviderKind::Groq)
                .with_model("llama-test")
                .with_api_key("test-key")
                .with_base_url(format!("{}/", server.uri())),
        );
        let tools = vec![ToolDefinition::new("read_file", "Read", RiskLevel::Low)];

        let response = client.complete(&request().with_tools(tools)).await.unwrap();
        let calls = response.tool_calls();
        assert_eq!(response.stop_reason, StopReason::ToolUse);
        assert_eq!(calls[0].id, "call_01");
        assert_eq!(calls[0].get_string("path"), Some("README.md"));
    }

    #[tokio::test]
    async fn test_ollama_without_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_partial_json(serde_json::json!({"stream": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "message": {"role": "assistant", "content": "local hello"},
                "done": true,
                "done_reason": "stop"
            })))
            .mount(&server)
            .await;

        let client = HttpLlmClient::new(
            LlmConfig::new(ProviderKind::Ollama)
                .with_model("llama3.1")
                .with_base_url(server.uri()),
        );

        let response = client.complete(&request()).await.unwrap();
        assert_eq!(response.text_content(), "local hello");
    }

    #[tokio::test]
    async fn test_http_error_keeps_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_string(
                r#"{"error":{"message":"Incorrect API key provided"}}"#,
            ))
            .mount(&server)
            .await;

        let client = HttpLlmClient::new(
            LlmConfig::new(ProviderKind::OpenAi)
                .with_api_key("bad-key")
                .with_base_url(server.uri()),
        );

        match client.complete(&request()).await {
            Err(ProviderError::Http { status, body }) => {
                assert_eq!(status, 401);
                assert!(body.contains("Incorrect API key"));
            }
            other => panic!("expected HTTP error, got {:?}", other.map(|r| r.text_content())),
        }
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_connection_error() {
        // Bind and drop a server so the port is closed.
        let uri = {
            let server = MockServer::start().await;
            server.uri()
        };
        let client = HttpLlmClient::new(LlmConfig::new(ProviderKind::Ollama).with_base_url(uri));

        assert!(matches!(
            client.complete(&request()).await,
            Err(ProviderError::Connection(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        // DeepSeek's env var is not expected to be set in the test environment.
        if std::env::var("DEEPSEEK_API_KEY").is_ok() {
            return;
        }
        let client = HttpLlmClient::new(
            LlmConfig::new(ProviderKind::DeepSeek).with_base_url(server.uri()),
        );

        match client.complete(&request()).await {
            Err(ProviderError::Auth { env_var, .. }) => assert_eq!(env_var, "DEEPSEEK_API_KEY"),
            other => panic!("expected auth error, got {:?}", other.map(|r| r.text_content())),
        }
    }

    #[test]
    fn test_replace_config_swaps_snapshot() {
        let client = HttpLlmClient::new(LlmConfig::new(ProviderKind::Anthropic).with_model("a"));
        client.replace_config(client.config().with_model("b"));
        assert_eq!(client.config().model, "b");
    }
}
