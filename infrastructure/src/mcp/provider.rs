//! [`ToolProvider`] over one MCP server.

use std::path::Path;

use async_trait::async_trait;
use shipwright_domain::tool::{
    ExecutionContext, ToolCall, ToolDefinition, ToolError, ToolProvider, ToolProviderError,
    ToolResult,
};
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::client::McpConnection;
use super::config::{McpServerConfig, load_registry};
use super::error::McpError;

pub struct McpToolProvider {
    id: String,
    name: String,
    connection: Mutex<McpConnection>,
}

impl McpToolProvider {
    pub async fn connect(name: &str, config: &McpServerConfig) -> Result<Self, McpError> {
        let connection = McpConnection::connect(name, config).await?;
        Ok(Self {
            id: format!("mcp:{}", name),
            name: name.to_string(),
            connection: Mutex::new(connection),
        })
    }

    pub async fn shutdown(&self) {
        self.connection.lock().await.shutdown().await;
    }
}

#[async_trait]
impl ToolProvider for McpToolProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    async fn is_available(&self) -> bool {
        self.connection.lock().await.is_alive()
    }

    async fn discover_tools(&self) -> Result<Vec<ToolDefinition>, ToolProviderError> {
        let mut connection = self.connection.lock().await;
        if !connection.is_alive() {
            return Err(ToolProviderError::NotAvailable(self.id.clone()));
        }
        connection
            .list_tools()
            .await
            .map_err(|e| ToolProviderError::DiscoveryFailed(e.to_string()))
    }

    async fn execute(&self, call: &ToolCall, _ctx: &ExecutionContext) -> ToolResult {
        let mut connection = self.connection.lock().await;
        if !connection.is_alive() {
            return ToolResult::failure(
                &call.tool_name,
                ToolError::execution_failed(format!("MCP server '{}' is not running", self.name)),
            );
        }

        match connection.call_tool(&call.tool_name, call.arguments_json()).await {
            Ok(output) if output.is_error => {
                ToolResult::failure(&call.tool_name, ToolError::execution_failed(output.text))
            }
            Ok(output) => ToolResult::success(&call.tool_name, output.text),
            Err(e) => ToolResult::failure(&call.tool_name, ToolError::execution_failed(e.to_string())),
        }
    }
}

/// Start every enabled server from the global and project registries.
/// Servers that fail to start are logged and skipped.
pub async fn connect_configured_servers(
    global_registry: Option<&Path>,
    working_dir: &Path,
) -> Vec<McpToolProvider> {
    let project = super::config::project_registry_path(working_dir);
    let registry = load_registry(global_registry, &project);

    let mut providers = Vec::new();
    for (name, config) in registry.enabled_servers() {
        match McpToolProvider::connect(&name, &config).await {
            Ok(provider) => {
                info!(server = %name, "MCP server connected");
                providers.push(provider);
            }
            Err(e) => warn!(server = %name, error = %e, "Failed to start MCP server, skipping"),
        }
    }
    providers
}

#[cfg(test)]
mod tests {
    use super::*;
    use shipwright_domain::safety::SafetyPolicy;
    use shipwright_domain::tool::{NeverConfirm, RiskLevel, ToolKind, codes};
    use std::sync::Arc;
    use tempfile::TempDir;

    /// Minimal MCP server: answers by method, emits a notification before
    /// the tools/list reply, logs a plain-text line before the `noisy`
    /// reply, and ignores notifications.
    const FAKE_SERVER: &str = r#"
while IFS= read -r line; do
  id=$(printf '%s' "$line" | sed -n 's/.*"id":\([0-9][0-9]*\).*/\1/p')
  case "$line" in
    *'"method":"initialize"'*)
      printf '{"jsonrpc":"2.0","id":%s,"result":{"protocolVersion":"2024-11-05","capabilities":{},"serverInfo":{"name":"fake","version":"0"}}}\n' "$id" ;;
    *'"method":"tools/list"'*)
      printf '{"jsonrpc":"2.0","method":"notifications/message","params":{"level":"info"}}\n'
      printf '{"jsonrpc":"2.0","id":%s,"result":{"tools":[{"name":"echo","description":"Echo text","inputSchema":{"type":"object","properties":{"text":{"type":"string"}},"required":["text"]}},{"name":"fail","description":"Always fails"}]}}\n' "$id" ;;
    *'"name":"noisy"'*)
      printf 'server: handling noisy call\n'
      printf '{"jsonrpc":"2.0","id":%s,"result":{"content":[{"type":"text","text":"quiet now"}]}}\n' "$id" ;;
    *'"name":"fail"'*)
      printf '{"jsonrpc":"2.0","id":%s,"result":{"content":[{"type":"text","text":"boom"}],"isError":true}}\n' "$id" ;;
    *'"method":"tools/call"'*)
      printf '{"jsonrpc":"2.0","id":%s,"result":{"content":[{"type":"text","text":"first"},{"type":"text","text":"second"}]}}\n' "$id" ;;
    *'"method":"quit"'*)
      exit 0 ;;
  esac
done
"#;

    fn server_config(dir: &TempDir) -> McpServerConfig {
        let script = dir.path().join("server.sh");
        std::fs::write(&script, FAKE_SERVER).unwrap();
        McpServerConfig {
            command: "sh".to_string(),
            args: vec![script.display().to_string()],
            ..Default::default()
        }
    }

    fn ctx(dir: &TempDir) -> ExecutionContext {
        ExecutionContext::new(
            dir.path(),
            Arc::new(NeverConfirm),
            Arc::new(SafetyPolicy::default()),
        )
    }

    #[tokio::test]
    async fn test_discovery_skips_notifications() {
        let dir = TempDir::new().unwrap();
        let provider = McpToolProvider::connect("fake", &server_config(&dir)).await.unwrap();

        assert_eq!(provider.id(), "mcp:fake");
        assert!(provider.is_available().await);

        let tools = provider.discover_tools().await.unwrap();
        assert_eq!(tools.len(), 2);
        assert_eq!(tools[0].name, "echo");
        assert_eq!(tools[0].risk_level, RiskLevel::Medium);
        assert_eq!(tools[0].kind, ToolKind::Other);
        assert_eq!(tools[0].input_schema.as_ref().unwrap()["required"][0], "text");
        assert_eq!(tools[1].input_schema, Some(serde_json::json!({"type": "object"})));
    }

    #[tokio::test]
    async fn test_call_joins_text_items() {
        let dir = TempDir::new().unwrap();
        let provider = McpToolProvider::connect("fake", &server_config(&dir)).await.unwrap();

        let call = ToolCall::new("echo").with_arg("text", "hi");
        let result = provider.execute(&call, &ctx(&dir)).await;

        assert!(result.is_success());
        assert_eq!(result.output(), Some("first\nsecond"));
    }

    #[tokio::test]
    async fn test_call_skips_plain_text_stdout_lines() {
        let dir = TempDir::new().unwrap();
        let provider = McpToolProvider::connect("fake", &server_config(&dir)).await.unwrap();

        let result = provider.execute(&ToolCall::new("noisy"), &ctx(&dir)).await;

        assert!(result.is_success());
        assert_eq!(result.output(), Some("quiet now"));
        assert!(provider.is_available().await);
    }

    #[tokio::test]
    async fn test_listing_timeout_retires_connection() {
        let dir = TempDir::new().unwrap();
        // Answers the handshake, then stalls halfway through the listing frame.
        let script = dir.path().join("stall.sh");
        std::fs::write(
            &script,
            r#"
while IFS= read -r line; do
  id=$(printf '%s' "$line" | sed -n 's/.*"id":\([0-9][0-9]*\).*/\1/p')
  case "$line" in
    *'"method":"initialize"'*)
      printf '{"jsonrpc":"2.0","id":%s,"result":{}}\n' "$id" ;;
    *'"method":"tools/list"'*)
      printf '{"jsonrpc":"2.0","id":%s,' "$id"
      sleep 30 ;;
  esac
done
"#,
        )
        .unwrap();
        let config = McpServerConfig {
            command: "sh".to_string(),
            args: vec![script.display().to_string()],
            timeout_secs: Some(1),
            ..Default::default()
        };
        let provider = McpToolProvider::connect("stall", &config).await.unwrap();

        assert!(matches!(
            provider.discover_tools().await,
            Err(ToolProviderError::DiscoveryFailed(_))
        ));
        assert!(!provider.is_available().await);
    }

    #[tokio::test]
    async fn test_is_error_maps_to_failure() {
        let dir = TempDir::new().unwrap();
        let provider = McpToolProvider::connect("fake", &server_config(&dir)).await.unwrap();

        let result = provider.execute(&ToolCall::new("fail"), &ctx(&dir)).await;

        assert_eq!(result.error().unwrap().code, codes::EXECUTION_FAILED);
        assert_eq!(result.error_message(), Some("boom"));
    }

    #[tokio::test]
    async fn test_dead_server_reports_no_tools() {
        let dir = TempDir::new().unwrap();
        let provider = McpToolProvider::connect("fake", &server_config(&dir)).await.unwrap();
        provider.shutdown().await;

        assert!(!provider.is_available().await);
        assert!(provider.discover_tools().await.is_err());
        assert!(!provider.has_tool("echo").await);
    }

    #[tokio::test]
    async fn test_spawn_failure_is_reported() {
        let config = McpServerConfig {
            command: "/nonexistent/shipwright-mcp-server".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            McpToolProvider::connect("missing", &config).await,
            Err(McpError::Spawn { .. })
        ));
    }

    #[tokio::test]
    async fn test_connect_configured_servers_skips_failures() {
        let dir = TempDir::new().unwrap();
        let config = server_config(&dir);
        let registry = serde_json::json!({
            "mcpServers": {
                "good": {"command": config.command, "args": config.args},
                "broken": {"command": "/nonexistent/server"},
                "off": {"command": "sh", "disabled": true}
            }
        });
        let path = super::super::config::project_registry_path(dir.path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, registry.to_string()).unwrap();

        let providers = connect_configured_servers(None, dir.path()).await;

        assert_eq!(providers.len(), 1);
        assert_eq!(providers[0].id(), "mcp:good");
    }
}
