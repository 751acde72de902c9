//! MCP adapter errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum McpError {
    #[error("failed to spawn MCP server '{server}': {source}")]
    Spawn {
        server: String,
        #[source]
        source: std::io::Error,
    },

    #[error("MCP server '{0}' closed its output")]
    Closed(String),

    #[error("MCP server '{server}' did not answer within {secs}s")]
    Timeout { server: String, secs: u64 },

    #[error("MCP server error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("invalid MCP registry {path}: {message}")]
    Registry { path: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON from MCP server: {0}")]
    Json(#[from] serde_json::Error),
}
