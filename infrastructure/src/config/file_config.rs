//! Raw configuration structures as read from TOML.
//!
//! Every section is `#[serde(default)]`, so a file only needs to mention
//! what it changes:
//!
//! ```toml
//! [llm]
//! provider = "groq"
//! model = "llama-3.3-70b-versatile"
//!
//! [agent]
//! max_loops = 20
//! auto_confirm = true
//!
//! [tools]
//! command_timeout_secs = 120
//! ```

use serde::{Deserialize, Serialize};
use shipwright_application::ExecutionParams;
use shipwright_domain::{DomainError, LlmConfig, ProviderKind};
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub llm: FileLlmConfig,
    pub agent: FileAgentConfig,
    pub tools: FileToolsConfig,
}

/// `[llm]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLlmConfig {
    /// Backend name (`anthropic`, `openai`, `deepseek`, `groq`, `openrouter`, `ollama`)
    pub provider: String,
    /// Model name; the backend's default model when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// API key; prefer the provider's environment variable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl Default for FileLlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default().to_string(),
            model: None,
            api_key: None,
            base_url: None,
            max_tokens: None,
            temperature: None,
        }
    }
}

/// `[agent]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_loops: Option<usize>,
    pub auto_confirm: bool,
    /// Replaces the built-in main agent prompt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

/// `[tools]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileToolsConfig {
    /// Default `run_command` timeout; a call may pass its own `timeout_secs`
    pub command_timeout_secs: u64,
    /// Connect the servers listed in `mcp.json`
    pub mcp_enabled: bool,
}

impl Default for FileToolsConfig {
    fn default() -> Self {
        Self {
            command_timeout_secs: 60,
            mcp_enabled: true,
        }
    }
}

impl FileToolsConfig {
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }
}

impl FileConfig {
    /// Reject values the runtime cannot honor.
    pub fn validate(&self) -> Result<(), DomainError> {
        self.llm.provider.parse::<ProviderKind>()?;
        if self.agent.max_loops == Some(0) {
            return Err(DomainError::InvalidConfig("agent.max_loops must be >= 1".into()));
        }
        if let Some(t) = self.llm.temperature
            && !(0.0..=2.0).contains(&t)
        {
            return Err(DomainError::InvalidConfig(format!(
                "llm.temperature must be between 0.0 and 2.0, got {}",
                t
            )));
        }
        if self.tools.command_timeout_secs == 0 {
            return Err(DomainError::InvalidConfig(
                "tools.command_timeout_secs must be >= 1".into(),
            ));
        }
        Ok(())
    }

    pub fn to_llm_config(&self) -> Result<LlmConfig, DomainError> {
        let provider: ProviderKind = self.llm.provider.parse()?;
        let mut config = LlmConfig::new(provider);
        if let Some(model) = self.llm.model.as_deref().filter(|m| !m.trim().is_empty()) {
            config = config.with_model(model);
        }
        config.api_key = self.llm.api_key.clone().filter(|k| !k.is_empty());
        config.base_url = self.llm.base_url.clone();
        config.max_tokens = self.llm.max_tokens;
        config.temperature = self.llm.temperature;
        Ok(config)
    }

    pub fn to_execution_params(&self) -> ExecutionParams {
        ExecutionParams {
            max_loops: self.agent.max_loops,
            auto_confirm: self.agent.auto_confirm,
            system_prompt: self.agent.system_prompt.clone(),
        }
    }
}
