//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and presentation
//! adapters implement.

pub mod agent_progress;
pub mod llm_client;
pub mod tool_dispatcher;
pub mod tool_schema;
