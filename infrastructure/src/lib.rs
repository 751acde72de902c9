//! Infrastructure layer for shipwright
//!
//! Adapters that implement the ports defined in the application layer:
//! the HTTP LLM client, builtin tools, MCP servers, the tool registry,
//! configuration loading and the project-context loader.

pub mod config;
pub mod context;
pub mod mcp;
pub mod providers;
pub mod tools;

pub use config::{ConfigError, ConfigLoader, FileConfig, load_policy};
pub use context::LocalContextLoader;
pub use mcp::{McpError, McpToolProvider, connect_configured_servers};
pub use providers::{HttpLlmClient, ProviderAdapter};
pub use tools::{BuiltinProvider, JsonSchemaToolConverter, ToolRegistry, builtin_tool_spec};
