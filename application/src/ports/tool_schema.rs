//! Tool schema conversion port.
//!
//! Separates "which tools to offer" (domain) from "how to serialize them
//! for a backend" (infrastructure). Every backend rendering starts from the
//! same provider-neutral JSON Schema, so required/optional fields never
//! diverge between them.

use shipwright_domain::tool::ToolDefinition;

/// Port for converting tool definitions to JSON Schema.
pub trait ToolSchemaPort: Send + Sync {
    /// Provider-neutral `{name, description, input_schema}` for one tool.
    fn tool_to_schema(&self, tool: &ToolDefinition) -> serde_json::Value;

    /// The `input_schema` object alone.
    fn parameters_schema(&self, tool: &ToolDefinition) -> serde_json::Value;

    /// All tools, in the given order.
    fn all_tools_schema(&self, tools: &[ToolDefinition]) -> Vec<serde_json::Value> {
        tools.iter().map(|t| self.tool_to_schema(t)).collect()
    }
}
