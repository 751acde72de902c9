//! Guarded capability dispatch.
//!
//! Every tool call the model emits passes through [`DispatchGuard::execute`]:
//!
//! 1. Agent allow-list (`PERMISSION_DENIED`)
//! 2. Registry lookup (`NOT_FOUND`)
//! 3. Argument validation (`INVALID_ARGUMENT`)
//! 4. Safety gate: block (`BLOCKED`), confirm (`CANCELLED` when declined) or proceed
//! 5. Registry dispatch
//!
//! None of these steps raise; every outcome is a [`ToolResult`].

use std::sync::Arc;

use shipwright_domain::safety::{GateDecision, SafetyGate};
use shipwright_domain::tool::{
    ConfirmationRequest, DefaultToolValidator, ExecutionContext, ToolCall, ToolDefinition,
    ToolError, ToolResult, ToolValidator,
};
use shipwright_domain::ToolAccess;
use tracing::{debug, info, warn};

use super::tool_helpers::tool_args_preview;
use crate::ports::tool_dispatcher::ToolDispatcherPort;

/// Safety gate and allow-list in front of the shared registry.
///
/// Cheap to clone; the main agent and every sub-agent share one instance.
#[derive(Clone)]
pub struct DispatchGuard {
    dispatcher: Arc<dyn ToolDispatcherPort>,
    gate: SafetyGate,
}

impl DispatchGuard {
    pub fn new(dispatcher: Arc<dyn ToolDispatcherPort>, gate: SafetyGate) -> Self {
        Self { dispatcher, gate }
    }

    pub fn dispatcher(&self) -> &Arc<dyn ToolDispatcherPort> {
        &self.dispatcher
    }

    pub fn gate(&self) -> SafetyGate {
        self.gate
    }

    /// Capabilities an agent with `access` is offered, in registry order.
    pub fn offered_tools(&self, access: &ToolAccess) -> Vec<ToolDefinition> {
        self.dispatcher
            .list_capabilities()
            .into_iter()
            .filter(|d| access.permits(&d.name))
            .collect()
    }

    pub async fn execute(
        &self,
        call: &ToolCall,
        access: &ToolAccess,
        ctx: &ExecutionContext,
    ) -> ToolResult {
        if !access.permits(&call.tool_name) {
            warn!(tool = %call.tool_name, "Tool not in agent allow-list");
            return ToolResult::failure(
                &call.tool_name,
                ToolError::permission_denied(format!(
                    "{} is not available to this agent",
                    call.tool_name
                )),
            );
        }

        let Some(definition) = self.dispatcher.definition(&call.tool_name) else {
            return ToolResult::failure(&call.tool_name, ToolError::tool_not_found(&call.tool_name));
        };

        if let Err(message) = DefaultToolValidator.validate(call, &definition) {
            return ToolResult::failure(&call.tool_name, ToolError::invalid_argument(message));
        }

        let assessment = self
            .gate
            .assess(&definition, call, ctx.policy(), ctx.working_dir());

        match assessment.decision {
            GateDecision::Block { reason } => {
                info!(tool = %call.tool_name, %reason, "Tool call blocked by policy");
                return ToolResult::failure(&call.tool_name, ToolError::blocked(reason));
            }
            GateDecision::Confirm { reason } => {
                let request = ConfirmationRequest {
                    tool_name: call.tool_name.clone(),
                    risk_level: assessment.risk,
                    reason,
                    summary: tool_args_preview(call),
                };
                if !ctx.confirmer().confirm(&request).await {
                    info!(tool = %call.tool_name, "Tool call declined");
                    return ToolResult::failure(&call.tool_name, ToolError::cancelled());
                }
            }
            GateDecision::Proceed => {}
        }

        debug!(tool = %call.tool_name, risk = %assessment.risk, "Dispatching tool call");
        self.dispatcher.dispatch(call, ctx).await
    }
}
