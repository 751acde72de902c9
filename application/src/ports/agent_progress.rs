//! Agent execution progress port.
//!
//! [`AgentProgressNotifier`] is an **output port** the presentation layer
//! implements to show what the loop is doing. All methods default to no-ops,
//! so implementers only override the callbacks they care about.

use shipwright_domain::{LoopPhase, ToolCall, ToolResult};

pub trait AgentProgressNotifier: Send + Sync {
    /// Called when the loop changes phase
    fn on_phase_change(&self, _agent: &str, _phase: LoopPhase) {}

    /// Called before each model call (1-based iteration)
    fn on_model_call_start(&self, _agent: &str, _iteration: usize) {}

    /// Called after each model call, with the number of tool calls requested
    fn on_model_call_end(&self, _agent: &str, _tool_calls: usize) {}

    /// Called before a tool call goes through the gate
    fn on_tool_call(&self, _call: &ToolCall) {}

    /// Called with every tool outcome, blocked and cancelled ones included
    fn on_tool_result(&self, _call: &ToolCall, _result: &ToolResult) {}

    /// Called when the loop is force-terminated at its iteration cap
    fn on_loop_limit(&self, _agent: &str, _max_loops: usize) {}

    /// Called when a directive hands the turn to a sub-agent
    fn on_sub_agent_start(&self, _preset: &str, _task: &str) {}

    fn on_sub_agent_end(&self, _preset: &str) {}
}

/// Notifier that ignores every callback.
pub struct NoAgentProgress;

impl AgentProgressNotifier for NoAgentProgress {}
