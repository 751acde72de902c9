//! Application-level configuration.

pub mod execution_params;

pub use execution_params::{DEFAULT_SYSTEM_PROMPT, ExecutionParams};
