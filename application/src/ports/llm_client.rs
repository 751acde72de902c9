//! LLM client port
//!
//! Defines how the agent loop talks to whichever backend is configured.
//! The infrastructure adapter selects the wire protocol; callers only ever
//! see canonical [`Message`]s and [`LlmResponse`]s.

use async_trait::async_trait;
use shipwright_domain::{LlmConfig, LlmResponse, Message, ToolDefinition};
use thiserror::Error;

/// Backend failures. Each one is fatal for the current user turn.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// No credential in the config or the provider's environment variable
    #[error("Missing API key for {provider}: set {env_var} or llm.api_key")]
    Auth { provider: String, env_var: String },

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// One model call: system payload, history, and offered capabilities.
#[derive(Debug, Clone, Default)]
pub struct LlmRequest {
    /// System prompt plus project knowledge, already concatenated
    pub system: Option<String>,
    pub messages: Vec<Message>,
    pub tools: Vec<ToolDefinition>,
}

impl LlmRequest {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            ..Default::default()
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }
}

/// Port for LLM communication.
///
/// Implementations hold an [`LlmConfig`] snapshot. Each call reads the
/// snapshot once; [`replace_config`](LlmClientPort::replace_config) swaps
/// it for subsequent calls and never affects one in flight.
#[async_trait]
pub trait LlmClientPort: Send + Sync {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, ProviderError>;

    /// Current snapshot.
    fn config(&self) -> LlmConfig;

    fn replace_config(&self, config: LlmConfig);
}
