//! Stdio JSON-RPC connection to one MCP server process.

use std::process::Stdio;
use std::time::Duration;

use serde_json::{Value, json};
use shipwright_domain::tool::{RiskLevel, ToolDefinition, ToolKind};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::{debug, info, trace};

use super::config::McpServerConfig;
use super::error::McpError;

pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Bound for the handshake and `tools/list` when the server entry sets none.
pub const DEFAULT_HANDSHAKE_TIMEOUT_SECS: u64 = 30;

/// Text content of a `tools/call` response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct McpToolOutput {
    pub text: String,
    pub is_error: bool,
}

pub struct McpConnection {
    server: String,
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    next_id: i64,
    handshake_timeout: Duration,
    /// Set when a timeout cancelled a read partway through a frame. The
    /// stream position is unknown after that, so the connection is dead.
    desynced: bool,
}

impl McpConnection {
    /// Spawn the server and complete the `initialize` handshake.
    pub async fn connect(server: &str, config: &McpServerConfig) -> Result<Self, McpError> {
        info!(server, command = %config.command, "Spawning MCP server");

        let mut cmd = Command::new(&config.command);
        cmd.args(&config.args)
            .envs(&config.env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        #[cfg(target_os = "linux")]
        // SAFETY: prctl is async-signal-safe and touches no shared state
        unsafe {
            cmd.pre_exec(|| {
                libc::prctl(libc::PR_SET_PDEATHSIG, libc::SIGTERM);
                Ok(())
            });
        }

        let mut child = cmd.spawn().map_err(|source| McpError::Spawn {
            server: server.to_string(),
            source,
        })?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            return Err(McpError::Closed(server.to_string()));
        };

        let mut connection = Self {
            server: server.to_string(),
            child,
            stdin,
            stdout: BufReader::new(stdout),
            next_id: 1,
            handshake_timeout: Duration::from_secs(
                config.timeout_secs.unwrap_or(DEFAULT_HANDSHAKE_TIMEOUT_SECS),
            ),
            desynced: false,
        };

        let handshake =
            tokio::time::timeout(connection.handshake_timeout, connection.initialize()).await;
        match handshake {
            Ok(result) => result?,
            Err(_) => return Err(connection.timeout_error()),
        }
        Ok(connection)
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    fn timeout_error(&self) -> McpError {
        McpError::Timeout {
            server: self.server.clone(),
            secs: self.handshake_timeout.as_secs(),
        }
    }

    async fn initialize(&mut self) -> Result<(), McpError> {
        let result = self
            .request(
                "initialize",
                json!({
                    "protocolVersion": PROTOCOL_VERSION,
                    "capabilities": {},
                    "clientInfo": {
                        "name": "shipwright",
                        "version": env!("CARGO_PKG_VERSION"),
                    }
                }),
            )
            .await?;
        debug!(server = %self.server, response = %result, "MCP initialize response");

        self.notify("notifications/initialized", json!({})).await
    }

    /// `tools/list`, mapped to definitions with medium risk and no kind.
    pub async fn list_tools(&mut self) -> Result<Vec<ToolDefinition>, McpError> {
        let timeout = self.handshake_timeout;
        let listed = tokio::time::timeout(timeout, self.request("tools/list", json!({}))).await;
        let result = match listed {
            Ok(result) => result?,
            Err(_) => {
                self.desynced = true;
                return Err(self.timeout_error());
            }
        };

        let tools = result
            .get("tools")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(|tool| {
                let name = tool.get("name").and_then(Value::as_str)?;
                let description = tool
                    .get("description")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                let schema = tool
                    .get("inputSchema")
                    .cloned()
                    .unwrap_or_else(|| json!({"type": "object"}));
                Some(
                    ToolDefinition::new(name, description, RiskLevel::Medium)
                        .with_kind(ToolKind::Other)
                        .with_input_schema(schema),
                )
            })
            .collect();

        Ok(tools)
    }

    /// `tools/call`. Text items are joined with newlines.
    pub async fn call_tool(&mut self, name: &str, arguments: Value) -> Result<McpToolOutput, McpError> {
        let arguments = if arguments.is_null() { json!({}) } else { arguments };
        let result = self
            .request("tools/call", json!({"name": name, "arguments": arguments}))
            .await?;

        let text = match result.get("content").and_then(Value::as_array) {
            Some(items) => items
                .iter()
                .filter_map(|item| item.get("text").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("\n"),
            None => result.to_string(),
        };

        Ok(McpToolOutput {
            text,
            is_error: result.get("isError").and_then(Value::as_bool).unwrap_or(false),
        })
    }

    pub fn is_alive(&mut self) -> bool {
        !self.desynced && matches!(self.child.try_wait(), Ok(None))
    }

    pub async fn shutdown(&mut self) {
        info!(server = %self.server, "Shutting down MCP server");
        let _ = self.child.kill().await;
    }

    async fn write_line(&mut self, message: &Value) -> Result<(), McpError> {
        let line = format!("{}\n", serde_json::to_string(message)?);
        self.stdin.write_all(line.as_bytes()).await?;
        self.stdin.flush().await?;
        Ok(())
    }

    async fn notify(&mut self, method: &str, params: Value) -> Result<(), McpError> {
        self.write_line(&json!({"jsonrpc": "2.0", "method": method, "params": params}))
            .await
    }

    /// Send a request and return its `result`, skipping any message whose
    /// id is not ours (server notifications, stale replies) and any line
    /// that is not JSON at all (servers that log to stdout).
    async fn request(&mut self, method: &str, params: Value) -> Result<Value, McpError> {
        let id = self.next_id;
        self.next_id += 1;

        self.write_line(&json!({"jsonrpc": "2.0", "id": id, "method": method, "params": params}))
            .await?;

        loop {
            let mut line = String::new();
            if self.stdout.read_line(&mut line).await? == 0 {
                return Err(McpError::Closed(self.server.clone()));
            }
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let Ok(message) = serde_json::from_str::<Value>(line) else {
                trace!(server = %self.server, line, "Skipping non-JSON line on MCP stdout");
                continue;
            };
            if message.get("id").and_then(Value::as_i64) != Some(id) {
                trace!(server = %self.server, message = line, "Skipping unrelated MCP message");
                continue;
            }

            if let Some(error) = message.get("error") {
                return Err(McpError::Rpc {
                    code: error.get("code").and_then(Value::as_i64).unwrap_or_default(),
                    message: error
                        .get("message")
                        .and_then(Value::as_str)
                        .unwrap_or("unknown error")
                        .to_string(),
                });
            }

            return Ok(message.get("result").cloned().unwrap_or(Value::Null));
        }
    }
}
