//! Tool provider abstraction
//!
//! This module defines the [`ToolProvider`] trait, the contract shared by the
//! in-process builtin tools and by capability servers hosted in external
//! processes.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     ToolRegistry                            │
//! │   builtin namespace first, delegated namespace second       │
//! └─────────────────────────────────────────────────────────────┘
//!           │                     │                  │
//!           ▼                     ▼                  ▼
//!    ┌──────────────┐     ┌──────────────┐   ┌──────────────┐
//!    │   Builtin    │     │  MCP server  │   │  MCP server  │
//!    │   Provider   │     │  "github"    │   │  "postgres"  │
//!    └──────────────┘     └──────────────┘   └──────────────┘
//! ```
//!
//! # Name collisions
//!
//! A builtin tool always shadows a delegated tool of the same name. Among
//! delegated providers, the one with the higher [`priority`](ToolProvider::priority)
//! wins.
//!
//! # Dynamic membership
//!
//! Delegated providers may gain or lose tools as their server process comes
//! and goes. [`discover_tools`](ToolProvider::discover_tools) is therefore
//! re-queried on refresh rather than cached forever.

use async_trait::async_trait;
use thiserror::Error;

use super::context::ExecutionContext;
use super::entities::{ToolCall, ToolDefinition};
use super::value_objects::ToolResult;

/// Error type for tool provider operations
#[derive(Debug, Error)]
pub enum ToolProviderError {
    /// Provider is not available (e.g., server process exited)
    #[error("Provider not available: {0}")]
    NotAvailable(String),

    /// Failed to discover tools from the provider
    #[error("Discovery failed: {0}")]
    DiscoveryFailed(String),

    /// Tool not found in this provider
    #[error("Tool not found: {0}")]
    ToolNotFound(String),
}

/// Source of tools: the builtin set or one capability server.
#[async_trait]
pub trait ToolProvider: Send + Sync {
    /// Unique identifier for this provider
    ///
    /// Examples: "builtin", "mcp:filesystem"
    fn id(&self) -> &str;

    /// Display name for user-facing output
    fn display_name(&self) -> &str;

    /// Whether this is the in-process builtin provider.
    ///
    /// Builtin tools win every name collision.
    fn is_builtin(&self) -> bool {
        false
    }

    /// Tie-breaker among delegated providers (higher = preferred)
    fn priority(&self) -> i32 {
        0
    }

    /// Check if the provider is available and properly configured
    async fn is_available(&self) -> bool;

    /// Discover available tools from this provider
    async fn discover_tools(&self) -> Result<Vec<ToolDefinition>, ToolProviderError>;

    /// Execute a tool call
    ///
    /// Failures are reported inside the returned [`ToolResult`].
    async fn execute(&self, call: &ToolCall, ctx: &ExecutionContext) -> ToolResult;

    /// Check if this provider currently offers a specific tool
    async fn has_tool(&self, tool_name: &str) -> bool {
        match self.discover_tools().await {
            Ok(tools) => tools.iter().any(|t| t.name == tool_name),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::safety::SafetyPolicy;
    use crate::tool::context::NeverConfirm;
    use crate::tool::entities::RiskLevel;
    use crate::tool::value_objects::ToolError;
    use std::sync::Arc;

    struct MockProvider {
        id: String,
        tools: Vec<ToolDefinition>,
        available: bool,
    }

    impl MockProvider {
        fn new(id: &str, available: bool) -> Self {
            Self {
                id: id.to_string(),
                tools: Vec::new(),
                available,
            }
        }

        fn with_tool(mut self, name: &str) -> Self {
            self.tools.push(ToolDefinition::new(
                name,
                format!("Mock tool: {}", name),
                RiskLevel::Low,
            ));
            self
        }
    }

    #[async_trait]
    impl ToolProvider for MockProvider {
        fn id(&self) -> &str {
            &self.id
        }

        fn display_name(&self) -> &str {
            "Mock Provider"
        }

        async fn is_available(&self) -> bool {
            self.available
        }

        async fn discover_tools(&self) -> Result<Vec<ToolDefinition>, ToolProviderError> {
            if self.available {
                Ok(self.tools.clone())
            } else {
                Err(ToolProviderError::NotAvailable("Mock not available".into()))
            }
        }

        async fn execute(&self, call: &ToolCall, _ctx: &ExecutionContext) -> ToolResult {
            if self.tools.iter().any(|t| t.name == call.tool_name) {
                ToolResult::success(&call.tool_name, "Mock output")
            } else {
                ToolResult::failure(&call.tool_name, ToolError::tool_not_found(&call.tool_name))
            }
        }
    }

    fn ctx() -> ExecutionContext {
        ExecutionContext::new("/tmp", Arc::new(NeverConfirm), Arc::new(SafetyPolicy::default()))
    }

    #[tokio::test]
    async fn test_provider_defaults() {
        let provider = MockProvider::new("mcp:mock", true);
        assert!(!provider.is_builtin());
        assert_eq!(provider.priority(), 0);
    }

    #[tokio::test]
    async fn test_provider_has_tool() {
        let provider = MockProvider::new("mock", true).with_tool("read_file");

        assert!(provider.has_tool("read_file").await);
        assert!(!provider.has_tool("unknown").await);
    }

    #[tokio::test]
    async fn test_unavailable_provider_has_no_tools() {
        let provider = MockProvider::new("mock", false).with_tool("read_file");

        assert!(!provider.is_available().await);
        assert!(!provider.has_tool("read_file").await);
    }

    #[tokio::test]
    async fn test_provider_execute() {
        let provider = MockProvider::new("mock", true).with_tool("read_file");

        let call = ToolCall::new("read_file").with_arg("path", "/test.txt");
        let result = provider.execute(&call, &ctx()).await;
        assert!(result.is_success());

        let missing = provider.execute(&ToolCall::new("nope"), &ctx()).await;
        assert!(!missing.is_success());
    }
}
