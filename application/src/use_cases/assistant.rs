//! Assistant: the single entry point for user input.
//!
//! Routes `@preset task` directives to the [`SubAgentManager`] and
//! everything else to the long-lived main agent.

use shipwright_domain::agent::{SubAgentPreset, parse_directive};
use shipwright_domain::{AgentConfig, LlmConfig, ToolDefinition};
use tracing::info;

use super::run_agent::{Agent, AgentOutcome, AgentRuntime, RunAgentError};
use super::sub_agent::SubAgentManager;

/// Which agent answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Responder {
    Main,
    SubAgent(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantReply {
    pub responder: Responder,
    pub outcome: AgentOutcome,
}

pub struct Assistant {
    main: Agent,
    sub_agents: SubAgentManager,
    runtime: AgentRuntime,
}

impl Assistant {
    pub fn new(main_config: AgentConfig, runtime: AgentRuntime) -> Self {
        Self {
            main: Agent::new(main_config, runtime.clone()),
            sub_agents: SubAgentManager::new(runtime.clone()),
            runtime,
        }
    }

    pub async fn handle(&mut self, input: &str) -> Result<AssistantReply, RunAgentError> {
        if let Some(directive) = parse_directive(input) {
            info!(preset = directive.preset.token, "Routing to sub-agent");
            let outcome = self.sub_agents.run(directive.preset, directive.task).await?;
            return Ok(AssistantReply {
                responder: Responder::SubAgent(directive.preset.token),
                outcome,
            });
        }

        let outcome = self.main.run(input).await?;
        Ok(AssistantReply {
            responder: Responder::Main,
            outcome,
        })
    }

    pub fn main_agent(&self) -> &Agent {
        &self.main
    }

    pub fn clear_history(&mut self) {
        self.main.clear_messages();
    }

    pub fn presets(&self) -> &'static [SubAgentPreset] {
        self.sub_agents.presets()
    }

    pub fn capabilities(&self) -> Vec<ToolDefinition> {
        self.runtime.guard.dispatcher().list_capabilities()
    }

    /// Re-query delegated capability sources.
    pub async fn refresh_tools(&self) -> usize {
        self.runtime.guard.dispatcher().refresh().await
    }

    pub fn llm_config(&self) -> LlmConfig {
        self.runtime.llm.config()
    }

    /// Switch model for subsequent calls by replacing the config snapshot.
    pub fn set_model(&self, model: &str) -> LlmConfig {
        let config = self.runtime.llm.config().with_model(model);
        self.runtime.llm.replace_config(config.clone());
        info!(model, "LLM model replaced");
        config
    }
}
