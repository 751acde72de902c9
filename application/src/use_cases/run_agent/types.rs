//! Type definitions for the agent loop.

use std::sync::Arc;

use shipwright_domain::ProjectContext;
use shipwright_domain::tool::ExecutionContext;
use thiserror::Error;

use crate::use_cases::dispatch_guard::DispatchGuard;
use crate::ports::agent_progress::{AgentProgressNotifier, NoAgentProgress};
use crate::ports::llm_client::{LlmClientPort, ProviderError};

/// Errors that end a run. Tool failures never show up here.
#[derive(Error, Debug)]
pub enum RunAgentError {
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Agent is already running")]
    AlreadyRunning,
}

/// What a completed run hands back to its caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentOutcome {
    /// Final assistant text; may be empty
    pub text: String,
    /// Model calls made during the run
    pub iterations: usize,
    /// The run was cut off at the iteration cap
    pub loop_limit_reached: bool,
}

/// Collaborators shared by the main agent and every sub-agent.
///
/// Only the LLM client, the guarded registry and the read-only project
/// snapshot are shared; message history never is.
#[derive(Clone)]
pub struct AgentRuntime {
    pub llm: Arc<dyn LlmClientPort>,
    pub guard: DispatchGuard,
    pub context: ExecutionContext,
    pub project: Arc<ProjectContext>,
    pub progress: Arc<dyn AgentProgressNotifier>,
}

impl AgentRuntime {
    pub fn new(llm: Arc<dyn LlmClientPort>, guard: DispatchGuard, context: ExecutionContext) -> Self {
        Self {
            llm,
            guard,
            context,
            project: Arc::new(ProjectContext::default()),
            progress: Arc::new(NoAgentProgress),
        }
    }

    pub fn with_project(mut self, project: Arc<ProjectContext>) -> Self {
        self.project = project;
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn AgentProgressNotifier>) -> Self {
        self.progress = progress;
        self
    }
}
