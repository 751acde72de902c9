//! Agent domain entities

use crate::session::entities::Message;
use serde::{Deserialize, Serialize};

/// Iteration cap applied when a config does not set one.
pub const DEFAULT_MAX_LOOPS: usize = 20;

/// Phase of the agent loop state machine.
///
/// ```text
/// Idle → CallingModel → DispatchingTools → CallingModel → … → Terminated
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopPhase {
    #[default]
    Idle,
    CallingModel,
    DispatchingTools,
    Terminated,
}

impl LoopPhase {
    pub fn as_str(&self) -> &str {
        match self {
            LoopPhase::Idle => "idle",
            LoopPhase::CallingModel => "calling_model",
            LoopPhase::DispatchingTools => "dispatching_tools",
            LoopPhase::Terminated => "terminated",
        }
    }
}

impl std::fmt::Display for LoopPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which capabilities an agent may invoke.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolAccess {
    /// Every capability in the registry, including ones discovered later
    #[default]
    All,
    /// Only the listed capability names
    Only(Vec<String>),
}

impl ToolAccess {
    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ToolAccess::Only(names.into_iter().map(Into::into).collect())
    }

    pub fn permits(&self, tool_name: &str) -> bool {
        match self {
            ToolAccess::All => true,
            ToolAccess::Only(names) => names.iter().any(|n| n == tool_name),
        }
    }
}

/// Policy for one kind of agent. Shared freely between instances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Agent type (e.g. "main", "test", "review")
    pub agent_type: String,
    pub name: String,
    pub system_prompt: String,
    pub available_tools: ToolAccess,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_loops: Option<usize>,
}

impl AgentConfig {
    pub fn new(
        agent_type: impl Into<String>,
        name: impl Into<String>,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            agent_type: agent_type.into(),
            name: name.into(),
            system_prompt: system_prompt.into(),
            available_tools: ToolAccess::All,
            max_loops: None,
        }
    }

    pub fn with_tools(mut self, access: ToolAccess) -> Self {
        self.available_tools = access;
        self
    }

    pub fn with_max_loops(mut self, max_loops: usize) -> Self {
        self.max_loops = Some(max_loops);
        self
    }

    /// Configured cap, or [`DEFAULT_MAX_LOOPS`]. Never below 1.
    pub fn effective_max_loops(&self) -> usize {
        self.max_loops.unwrap_or(DEFAULT_MAX_LOOPS).max(1)
    }
}

/// Runtime state owned by exactly one agent loop.
#[derive(Debug, Clone)]
pub struct AgentState {
    pub id: String,
    pub config: AgentConfig,
    pub messages: Vec<Message>,
    pub is_running: bool,
}

impl AgentState {
    pub fn new(id: impl Into<String>, config: AgentConfig) -> Self {
        Self {
            id: id.into(),
            config,
            messages: Vec::new(),
            is_running: false,
        }
    }

    /// Text of the most recent assistant message, empty if none.
    pub fn last_assistant_text(&self) -> &str {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == crate::session::entities::Role::Assistant)
            .map(|m| m.content.as_str())
            .unwrap_or("")
    }
}
