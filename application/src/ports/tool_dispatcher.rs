//! Tool dispatcher port
//!
//! One namespace over builtin and delegated capabilities. The agent loop
//! never sees where a capability comes from.

use async_trait::async_trait;
use shipwright_domain::tool::{ExecutionContext, ToolCall, ToolDefinition, ToolResult};

/// Port for capability lookup and invocation.
#[async_trait]
pub trait ToolDispatcherPort: Send + Sync {
    /// Every known capability, builtin first.
    fn list_capabilities(&self) -> Vec<ToolDefinition>;

    /// Definition of a capability by name.
    fn definition(&self, name: &str) -> Option<ToolDefinition> {
        self.list_capabilities().into_iter().find(|d| d.name == name)
    }

    /// Invoke a capability. Failures come back as a failed [`ToolResult`].
    async fn dispatch(&self, call: &ToolCall, ctx: &ExecutionContext) -> ToolResult;

    /// Re-query delegated sources. Returns the number of capabilities
    /// after the refresh.
    async fn refresh(&self) -> usize;
}
