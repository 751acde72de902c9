//! JSON Schema tool converter.
//!
//! Default implementation of [`ToolSchemaPort`]. Every provider adapter
//! renders its tool declarations from this one schema.

use shipwright_application::ports::tool_schema::ToolSchemaPort;
use shipwright_domain::tool::ToolDefinition;

/// Produces provider-neutral JSON Schema.
///
/// Delegated tools carry their own `input_schema` and pass through as-is.
/// Builtin parameters map `param_type` to a JSON Schema type:
/// - `"string"`, `"path"` → `"string"`
/// - `"number"` → `"number"`
/// - `"integer"` → `"integer"`
/// - `"boolean"` → `"boolean"`
/// - anything else → `"string"`
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSchemaToolConverter;

impl ToolSchemaPort for JsonSchemaToolConverter {
    fn tool_to_schema(&self, tool: &ToolDefinition) -> serde_json::Value {
        serde_json::json!({
            "name": tool.name,
            "description": tool.description,
            "input_schema": self.parameters_schema(tool),
        })
    }

    fn parameters_schema(&self, tool: &ToolDefinition) -> serde_json::Value {
        if let Some(schema) = &tool.input_schema {
            return schema.clone();
        }

        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for param in &tool.parameters {
            let schema_type = match param.param_type.as_str() {
                "string" | "path" => "string",
                "number" => "number",
                "integer" => "integer",
                "boolean" => "boolean",
                _ => "string",
            };

            properties.insert(
                param.name.clone(),
                serde_json::json!({
                    "type": schema_type,
                    "description": param.description,
                }),
            );

            if param.required {
                required.push(serde_json::json!(param.name));
            }
        }

        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}
