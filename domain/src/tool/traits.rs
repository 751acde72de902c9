//! Tool domain traits
//!
//! Pure validation of a call against its definition, no I/O.

use super::entities::{ToolCall, ToolDefinition};

/// Validator for tool calls
pub trait ToolValidator {
    /// Validate a tool call against its definition
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), String>;
}

/// Checks required parameters and rejects unknown ones.
///
/// Definitions that carry a raw `input_schema` are owned by an external
/// server, which validates its own input; they pass through untouched.
#[derive(Debug, Clone, Default)]
pub struct DefaultToolValidator;

impl ToolValidator for DefaultToolValidator {
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), String> {
        if definition.input_schema.is_some() {
            return Ok(());
        }

        for param in &definition.parameters {
            if param.required && !call.arguments.contains_key(&param.name) {
                return Err(format!(
                    "Missing required parameter '{}' for tool '{}'",
                    param.name, definition.name
                ));
            }
        }

        if let Some(unknown) = call
            .arguments
            .keys()
            .find(|arg| !definition.parameters.iter().any(|p| &p.name == *arg))
        {
            return Err(format!(
                "Unknown parameter '{}' for tool '{}'",
                unknown, definition.name
            ));
        }

        Ok(())
    }
}
