//! Application layer for shipwright
//!
//! Ports (traits implemented by infrastructure and presentation) and the
//! use cases built on them: the bounded agent loop, guarded dispatch,
//! sub-agents and the assistant router. Depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

pub use config::{DEFAULT_SYSTEM_PROMPT, ExecutionParams};
pub use ports::{
    agent_progress::{AgentProgressNotifier, NoAgentProgress},
    llm_client::{LlmClientPort, LlmRequest, ProviderError},
    tool_dispatcher::ToolDispatcherPort,
    tool_schema::ToolSchemaPort,
};
pub use use_cases::{
    assistant::{Assistant, AssistantReply, Responder},
    dispatch_guard::DispatchGuard,
    run_agent::{Agent, AgentOutcome, AgentRuntime, RunAgentError},
    sub_agent::SubAgentManager,
};
