//! LLM provider adapters.
//!
//! Three wire families sit behind one [`ProviderAdapter`] value, chosen once
//! from [`ProviderKind`]. Nothing outside [`ProviderAdapter::for_kind`]
//! branches on provider identity.
//!
//! | Adapter | Providers | Endpoint |
//! |---------|-----------|----------|
//! | `Anthropic` | anthropic | `{base}/v1/messages` |
//! | `OpenAiCompatible` | openai, deepseek, groq, openrouter | `{base}/chat/completions` |
//! | `Ollama` | ollama | `{base}/api/chat` |

pub mod anthropic;
pub mod client;
pub mod ollama;
pub mod openai;

pub use client::HttpLlmClient;

use serde_json::Value;
use shipwright_application::ports::llm_client::{LlmRequest, ProviderError};
use shipwright_application::ports::tool_schema::ToolSchemaPort;
use shipwright_domain::{LlmConfig, LlmResponse, ProviderKind, Role};

/// `{normalize, parse}` for one backend family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderAdapter {
    Anthropic,
    OpenAiCompatible,
    Ollama,
}

impl ProviderAdapter {
    pub fn for_kind(kind: ProviderKind) -> Self {
        match kind {
            ProviderKind::Anthropic => ProviderAdapter::Anthropic,
            ProviderKind::OpenAi
            | ProviderKind::DeepSeek
            | ProviderKind::Groq
            | ProviderKind::OpenRouter => ProviderAdapter::OpenAiCompatible,
            ProviderKind::Ollama => ProviderAdapter::Ollama,
        }
    }

    pub fn endpoint(&self, base_url: &str) -> String {
        match self {
            ProviderAdapter::Anthropic => anthropic::endpoint(base_url),
            ProviderAdapter::OpenAiCompatible => openai::endpoint(base_url),
            ProviderAdapter::Ollama => ollama::endpoint(base_url),
        }
    }

    /// Canonical request → wire body.
    pub fn normalize(
        &self,
        config: &LlmConfig,
        request: &LlmRequest,
        schema: &dyn ToolSchemaPort,
    ) -> Value {
        match self {
            ProviderAdapter::Anthropic => anthropic::normalize(config, request, schema),
            ProviderAdapter::OpenAiCompatible => openai::normalize(config, request, schema),
            ProviderAdapter::Ollama => ollama::normalize(config, request, schema),
        }
    }

    /// Wire body → canonical response.
    pub fn parse(&self, body: &Value) -> Result<LlmResponse, ProviderError> {
        match self {
            ProviderAdapter::Anthropic => anthropic::parse(body),
            ProviderAdapter::OpenAiCompatible => openai::parse(body),
            ProviderAdapter::Ollama => ollama::parse(body),
        }
    }

    /// Attach credentials to an outbound request.
    pub fn authorize(
        &self,
        builder: reqwest::RequestBuilder,
        api_key: Option<&str>,
    ) -> reqwest::RequestBuilder {
        match (self, api_key) {
            (ProviderAdapter::Anthropic, Some(key)) => builder
                .header("x-api-key", key)
                .header("anthropic-version", anthropic::ANTHROPIC_VERSION),
            (ProviderAdapter::Anthropic, None) => {
                builder.header("anthropic-version", anthropic::ANTHROPIC_VERSION)
            }
            (_, Some(key)) => builder.bearer_auth(key),
            (_, None) => builder,
        }
    }
}

/// The single system payload for one call: the request's system text
/// followed by any system-role history entries.
pub(crate) fn system_payload(request: &LlmRequest) -> Option<String> {
    let parts: Vec<&str> = request
        .system
        .as_deref()
        .into_iter()
        .chain(
            request
                .messages
                .iter()
                .filter(|m| m.role == Role::System)
                .map(|m| m.content.as_str()),
        )
        .filter(|s| !s.trim().is_empty())
        .collect();

    (!parts.is_empty()).then(|| parts.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shipwright_domain::Message;

    #[test]
    fn test_adapter_selection() {
        assert_eq!(ProviderAdapter::for_kind(ProviderKind::Anthropic), ProviderAdapter::Anthropic);
        for kind in [ProviderKind::OpenAi, ProviderKind::DeepSeek, ProviderKind::Groq, ProviderKind::OpenRouter] {
            assert_eq!(ProviderAdapter::for_kind(kind), ProviderAdapter::OpenAiCompatible);
        }
        assert_eq!(ProviderAdapter::for_kind(ProviderKind::Ollama), ProviderAdapter::Ollama);
    }

    #[test]
    fn test_endpoints() {
        assert_eq!(
            ProviderAdapter::Anthropic.endpoint("https://api.anthropic.com"),
            "https://api.anthropic.com/v1/messages"
        );
        assert_eq!(
            ProviderAdapter::OpenAiCompatible.endpoint("https://api.groq.com/openai/v1"),
            "https://api.groq.com/openai/v1/chat/completions"
        );
        assert_eq!(
            ProviderAdapter::Ollama.endpoint("http://localhost:11434"),
            "http://localhost:11434/api/chat"
        );
    }

    #[test]
    fn test_system_payload_is_single() {
        let request = LlmRequest::new(vec![Message::system("Extra rules."), Message::user("hi")])
            .with_system("Base prompt.");
        assert_eq!(
            system_payload(&request).as_deref(),
            Some("Base prompt.\n\nExtra rules.")
        );
        assert_eq!(system_payload(&LlmRequest::new(vec![Message::user("hi")])), None);
    }
}
