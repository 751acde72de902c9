//! Domain layer for shipwright
//!
//! Pure entities, value objects and safety rules of the agent execution
//! core. No I/O lives here.
//!
//! - [`session`]: canonical messages and LLM responses shared by every backend
//! - [`tool`]: capability definitions, calls, results and the provider contract
//! - [`safety`]: the gate that classifies and authorizes each invocation
//! - [`agent`]: loop policy, runtime state and sub-agent presets
//! - [`providers`]: backend selection and the LLM config snapshot
//! - [`context`]: project knowledge shared read-only between agents

pub mod agent;
pub mod context;
pub mod core;
pub mod providers;
pub mod safety;
pub mod session;
pub mod tool;

pub use agent::{
    AgentConfig, AgentState, DEFAULT_MAX_LOOPS, Directive, LoopPhase, PRESETS, SubAgentPreset,
    ToolAccess, find_preset, parse_directive,
};
pub use context::{KnownContextFile, LoadedContextFile, ProjectContext};
pub use core::error::DomainError;
pub use providers::{DEFAULT_MAX_TOKENS, LlmConfig, ProviderKind};
pub use safety::{GateDecision, PathViolation, SafetyAssessment, SafetyGate, SafetyPolicy};
pub use session::{ContentBlock, LlmResponse, Message, Role, StopReason, ToolResultRecord};
pub use tool::{
    AlwaysConfirm, ConfirmAction, ConfirmationRequest, DefaultToolValidator, ExecutionContext,
    NeverConfirm, RiskLevel, ToolCall, ToolDefinition, ToolError, ToolKind,
    ToolParameter, ToolProvider, ToolProviderError, ToolResult, ToolResultMetadata, ToolSpec,
    ToolValidator,
};
