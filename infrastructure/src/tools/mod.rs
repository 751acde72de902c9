//! Capability implementations and the registry that routes to them.
//!
//! - [`builtin`]: the in-process file, search and command tools
//! - [`registry`]: [`ToolRegistry`], the single dispatcher over builtin and
//!   delegated providers
//! - [`schema`]: [`JsonSchemaToolConverter`], the canonical tool schema

pub mod builtin;
pub mod command;
pub mod file;
pub mod registry;
pub mod schema;
pub mod search;

pub use builtin::{BUILTIN_PROVIDER_ID, BuiltinProvider, builtin_tool_spec};
pub use registry::ToolRegistry;
pub use schema::JsonSchemaToolConverter;
