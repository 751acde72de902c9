//! Execution parameters for the main agent.
//!
//! [`ExecutionParams`] carries the `[agent]` settings from the config file
//! after CLI overrides have been applied.

use shipwright_domain::{AgentConfig, ToolAccess};

/// Prompt used when the config does not override it.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are Shipwright, an autonomous coding assistant \
working inside the user's project directory. Use the available tools to inspect and change \
the codebase. Prefer reading before writing, keep changes minimal, and explain what you did \
in a short final answer. Paths are relative to the working directory unless absolute.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionParams {
    /// Iteration cap for the main agent; `None` uses the domain default
    pub max_loops: Option<usize>,
    /// Skip confirmation for medium-risk capabilities
    pub auto_confirm: bool,
    pub system_prompt: Option<String>,
}

impl ExecutionParams {
    pub fn with_max_loops(mut self, max_loops: usize) -> Self {
        self.max_loops = Some(max_loops);
        self
    }

    pub fn with_auto_confirm(mut self, auto_confirm: bool) -> Self {
        self.auto_confirm = auto_confirm;
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Unrestricted config for the long-lived main agent.
    pub fn main_agent_config(&self) -> AgentConfig {
        let prompt = self
            .system_prompt
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(DEFAULT_SYSTEM_PROMPT);

        let config = AgentConfig::new("main", "Shipwright", prompt).with_tools(ToolAccess::All);
        match self.max_loops {
            Some(n) => config.with_max_loops(n),
            None => config,
        }
    }
}
