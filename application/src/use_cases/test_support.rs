//! Scripted fakes shared by the use case tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use shipwright_domain::safety::{SafetyGate, SafetyPolicy};
use shipwright_domain::tool::{
    AlwaysConfirm, ConfirmAction, ExecutionContext, RiskLevel, ToolCall, ToolDefinition, ToolKind,
    ToolParameter, ToolResult,
};
use shipwright_domain::{ContentBlock, LlmConfig, LlmResponse, StopReason};

use crate::ports::llm_client::{LlmClientPort, LlmRequest, ProviderError};
use crate::ports::tool_dispatcher::ToolDispatcherPort;
use crate::use_cases::dispatch_guard::DispatchGuard;
use crate::use_cases::run_agent::AgentRuntime;

/// LLM fake that replays queued responses and records every request.
pub(crate) struct ScriptedLlm {
    responses: Mutex<VecDeque<Result<LlmResponse, ProviderError>>>,
    /// Returned once the script runs dry
    fallback: Option<LlmResponse>,
    pub requests: Mutex<Vec<LlmRequest>>,
    config: Mutex<LlmConfig>,
}

impl ScriptedLlm {
    pub fn new(responses: Vec<Result<LlmResponse, ProviderError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            fallback: None,
            requests: Mutex::new(Vec::new()),
            config: Mutex::new(LlmConfig::default()),
        }
    }

    /// Answer every call with the same response.
    pub fn repeating(response: LlmResponse) -> Self {
        Self {
            fallback: Some(response),
            ..Self::new(Vec::new())
        }
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn request(&self, index: usize) -> LlmRequest {
        self.requests.lock().unwrap()[index].clone()
    }
}

#[async_trait]
impl LlmClientPort for ScriptedLlm {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, ProviderError> {
        self.requests.lock().unwrap().push(request.clone());
        match self.responses.lock().unwrap().pop_front() {
            Some(next) => next,
            None => self
                .fallback
                .clone()
                .ok_or_else(|| ProviderError::InvalidResponse("script exhausted".to_string())),
        }
    }

    fn config(&self) -> LlmConfig {
        self.config.lock().unwrap().clone()
    }

    fn replace_config(&self, config: LlmConfig) {
        *self.config.lock().unwrap() = config;
    }
}

/// Registry fake with the builtin names; records dispatch order.
pub(crate) struct FakeRegistry {
    tools: Vec<ToolDefinition>,
    pub dispatched: Mutex<Vec<ToolCall>>,
}

impl FakeRegistry {
    pub fn new() -> Self {
        let path = || ToolParameter::new("path", "Path", false);
        Self {
            tools: vec![
                ToolDefinition::new("read_file", "Read a file", RiskLevel::Low)
                    .with_kind(ToolKind::Read)
                    .with_parameter(path()),
                ToolDefinition::new("list_files", "List a directory", RiskLevel::Low)
                    .with_kind(ToolKind::Read)
                    .with_parameter(path()),
                ToolDefinition::new("write_file", "Write a file", RiskLevel::Medium)
                    .with_kind(ToolKind::Write)
                    .with_parameter(path())
                    .with_parameter(ToolParameter::new("content", "Content", false)),
                ToolDefinition::new("run_command", "Run a command", RiskLevel::Medium)
                    .with_kind(ToolKind::Command)
                    .with_parameter(ToolParameter::new("command", "Command", true)),
            ],
            dispatched: Mutex::new(Vec::new()),
        }
    }

    pub fn dispatched_names(&self) -> Vec<String> {
        self.dispatched
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.tool_name.clone())
            .collect()
    }
}

#[async_trait]
impl ToolDispatcherPort for FakeRegistry {
    fn list_capabilities(&self) -> Vec<ToolDefinition> {
        self.tools.clone()
    }

    async fn dispatch(&self, call: &ToolCall, _ctx: &ExecutionContext) -> ToolResult {
        self.dispatched.lock().unwrap().push(call.clone());
        ToolResult::success(&call.tool_name, format!("{} output", call.tool_name))
    }

    async fn refresh(&self) -> usize {
        self.tools.len()
    }
}

pub(crate) fn tool_use(id: &str, name: &str, args: serde_json::Value) -> ContentBlock {
    let input = args
        .as_object()
        .map(|m| m.clone().into_iter().collect())
        .unwrap_or_default();
    ContentBlock::ToolUse {
        id: id.to_string(),
        name: name.to_string(),
        input,
    }
}

pub(crate) fn tool_response(text: &str, blocks: Vec<ContentBlock>) -> LlmResponse {
    let mut content = Vec::new();
    if !text.is_empty() {
        content.push(ContentBlock::Text(text.to_string()));
    }
    content.extend(blocks);
    LlmResponse {
        content,
        stop_reason: StopReason::ToolUse,
        model: None,
    }
}

pub(crate) fn runtime_with(
    llm: Arc<ScriptedLlm>,
    registry: Arc<FakeRegistry>,
    confirm: Arc<dyn ConfirmAction>,
    auto_confirm: bool,
) -> AgentRuntime {
    let guard = DispatchGuard::new(registry, SafetyGate::new(auto_confirm));
    let ctx = ExecutionContext::new("/work/app", confirm, Arc::new(SafetyPolicy::default()));
    AgentRuntime::new(llm, guard, ctx)
}

pub(crate) fn runtime(llm: Arc<ScriptedLlm>, registry: Arc<FakeRegistry>) -> AgentRuntime {
    runtime_with(llm, registry, Arc::new(AlwaysConfirm), true)
}
