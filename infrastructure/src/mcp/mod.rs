//! Delegated capabilities hosted by MCP servers over stdio.
//!
//! - [`config`]: the `mcp.json` registry and `${VAR}` substitution
//! - [`client`]: one JSON-RPC connection per server process
//! - [`provider`]: [`McpToolProvider`], plugging a server into the registry

pub mod client;
pub mod config;
pub mod error;
pub mod provider;

pub use client::{McpConnection, McpToolOutput};
pub use config::{McpRegistryDocument, McpServerConfig, global_registry_path};
pub use error::McpError;
pub use provider::{McpToolProvider, connect_configured_servers};
