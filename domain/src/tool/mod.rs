//! Tool domain module
//!
//! This module defines the core abstractions of the **capability system**:
//! how the agent acts on the local environment (file I/O, commands, search)
//! in a validated, risk-aware manner.
//!
//! # Overview
//!
//! ```text
//! ┌────────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ ToolDefinition │───▶│ ToolCall     │───▶│ ToolResult   │
//! │ (schema, risk) │    │ (invocation) │    │ (observation)│
//! └────────────────┘    └──────────────┘    └──────────────┘
//!                              │
//!                              ▼
//!                     ExecutionContext
//!           (working dir, safety policy, confirm callback)
//! ```
//!
//! # Risk Levels
//!
//! | Risk | Examples | Confirmation |
//! |------|----------|--------------|
//! | **Low** | `read_file`, `list_files`, `search_codebase` | Never |
//! | **Medium** | `write_file`, `run_command` | Unless auto-confirm or whitelisted |
//! | **High** | `delete_file`, dangerous commands | Always |
//!
//! # Key Types
//!
//! - [`ToolDefinition`]: schema for a single tool (name, params, risk level, kind)
//! - [`ToolSpec`]: ordered set of definitions
//! - [`ToolCall`]: an invocation request with arguments
//! - [`ToolResult`]: execution outcome with [`ToolResultMetadata`](value_objects::ToolResultMetadata)
//! - [`ToolProvider`]: builtin or delegated source of tools
//! - [`ExecutionContext`]: what every invocation receives besides its arguments

pub mod context;
pub mod entities;
pub mod provider;
pub mod traits;
pub mod value_objects;

pub use context::{AlwaysConfirm, ConfirmAction, ConfirmationRequest, ExecutionContext, NeverConfirm};
pub use entities::{RiskLevel, ToolCall, ToolDefinition, ToolKind, ToolParameter, ToolSpec};
pub use provider::{ToolProvider, ToolProviderError};
pub use traits::{DefaultToolValidator, ToolValidator};
pub use value_objects::{ToolError, ToolResult, ToolResultMetadata, codes};
