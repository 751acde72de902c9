//! Tool domain entities

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Risk level of a tool operation
///
/// Governs the confirmation policy applied by the safety gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Read-only operations (e.g., read_file, list_files, search_codebase)
    Low,
    /// State-modifying operations that are usually safe (e.g., write_file, run_command)
    Medium,
    /// Destructive operations (e.g., delete_file) or commands flagged as dangerous
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What a tool does to the environment.
///
/// The safety gate uses this to decide which argument-level checks apply:
/// write and delete tools get path authorization on their `path` argument,
/// command tools get dangerous-content inspection on their `command` argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    Read,
    Write,
    Delete,
    Command,
    #[default]
    Other,
}

/// Definition of a tool that can be used by the agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique name of the tool (e.g., "read_file")
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Static risk level of this tool
    pub risk_level: RiskLevel,
    /// Environment effect, drives path and command checks
    #[serde(default)]
    pub kind: ToolKind,
    /// Forces at least medium-risk handling regardless of `risk_level`
    #[serde(default)]
    pub requires_confirmation: bool,
    /// Parameter specifications (builtin tools)
    #[serde(default)]
    pub parameters: Vec<ToolParameter>,
    /// Raw JSON schema for the input object (delegated tools)
    ///
    /// When present it is used verbatim instead of `parameters`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<serde_json::Value>,
}

/// Parameter specification for a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameter {
    /// Parameter name
    pub name: String,
    /// Parameter description
    pub description: String,
    /// Whether this parameter is required
    pub required: bool,
    /// Parameter type hint (e.g., "string", "path", "number")
    pub param_type: String,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        risk_level: RiskLevel,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            risk_level,
            kind: ToolKind::Other,
            requires_confirmation: false,
            parameters: Vec::new(),
            input_schema: None,
        }
    }

    pub fn with_kind(mut self, kind: ToolKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_parameter(mut self, param: ToolParameter) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn with_input_schema(mut self, schema: serde_json::Value) -> Self {
        self.input_schema = Some(schema);
        self
    }

    pub fn requiring_confirmation(mut self) -> Self {
        self.requires_confirmation = true;
        self
    }

    /// Risk level after applying `requires_confirmation`.
    pub fn effective_risk(&self) -> RiskLevel {
        if self.requires_confirmation {
            self.risk_level.max(RiskLevel::Medium)
        } else {
            self.risk_level
        }
    }
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required,
            param_type: "string".to_string(),
        }
    }

    pub fn with_type(mut self, param_type: impl Into<String>) -> Self {
        self.param_type = param_type.into();
        self
    }
}

/// Ordered collection of tool definitions.
///
/// Insertion order is preserved so listings stay stable between calls.
/// Registering a name twice keeps the first definition.
#[derive(Debug, Clone, Default)]
pub struct ToolSpec {
    tools: Vec<ToolDefinition>,
}

impl ToolSpec {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    pub fn register(mut self, tool: ToolDefinition) -> Self {
        if !self.contains(&tool.name) {
            self.tools.push(tool);
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.iter().find(|t| t.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn all(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.iter()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// A call to a tool with arguments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Backend-assigned (or synthetic) id, unique within one model turn
    pub id: String,
    /// Name of the tool to call
    pub tool_name: String,
    /// Arguments passed to the tool
    pub arguments: HashMap<String, serde_json::Value>,
}

impl ToolCall {
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            tool_name: tool_name.into(),
            arguments: HashMap::new(),
        }
    }

    /// Build a call from a backend tool-use payload.
    pub fn from_native(
        id: impl Into<String>,
        tool_name: impl Into<String>,
        arguments: HashMap<String, serde_json::Value>,
    ) -> Self {
        Self {
            id: id.into(),
            tool_name: tool_name.into(),
            arguments,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    /// Arguments as a JSON object (for wire encoding).
    pub fn arguments_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.arguments
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }

    /// Get a string argument
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(|v| v.as_str())
    }

    /// Get a required string argument or return an error message
    pub fn require_string(&self, key: &str) -> Result<&str, String> {
        self.get_string(key)
            .ok_or_else(|| format!("Missing required argument: {}", key))
    }

    /// Get an optional i64 argument
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.arguments.get(key).and_then(|v| v.as_i64())
    }

    /// Get an optional bool argument
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.arguments.get(key).and_then(|v| v.as_bool())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_level_ordering() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::Medium < RiskLevel::High);
        assert_eq!(RiskLevel::Medium.to_string(), "medium");
    }

    #[test]
    fn test_requires_confirmation_raises_low_to_medium() {
        let tool = ToolDefinition::new("notify", "Send a notification", RiskLevel::Low)
            .requiring_confirmation();
        assert_eq!(tool.effective_risk(), RiskLevel::Medium);

        let high = ToolDefinition::new("delete_file", "Delete", RiskLevel::High)
            .requiring_confirmation();
        assert_eq!(high.effective_risk(), RiskLevel::High);
    }

    #[test]
    fn test_tool_definition() {
        let tool = ToolDefinition::new("read_file", "Read file contents", RiskLevel::Low)
            .with_kind(ToolKind::Read)
            .with_parameter(
                ToolParameter::new("path", "File path to read", true).with_type("path"),
            );

        assert_eq!(tool.name, "read_file");
        assert_eq!(tool.kind, ToolKind::Read);
        assert_eq!(tool.parameters.len(), 1);
        assert_eq!(tool.parameters[0].name, "path");
    }

    #[test]
    fn test_tool_spec_preserves_order_and_first_registration() {
        let spec = ToolSpec::new()
            .register(ToolDefinition::new("write_file", "Write file", RiskLevel::Medium))
            .register(ToolDefinition::new("read_file", "Read file", RiskLevel::Low))
            .register(ToolDefinition::new("write_file", "Shadow", RiskLevel::Low));

        let names: Vec<_> = spec.all().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["write_file", "read_file"]);
        assert_eq!(spec.get("write_file").unwrap().description, "Write file");
        assert!(spec.get("unknown").is_none());
    }

    #[test]
    fn test_tool_call_arguments() {
        let call = ToolCall::new("read_file")
            .with_id("toolu_1")
            .with_arg("path", "/tmp/a.txt")
            .with_arg("limit", 10);

        assert_eq!(call.id, "toolu_1");
        assert_eq!(call.get_string("path"), Some("/tmp/a.txt"));
        assert_eq!(call.get_i64("limit"), Some(10));
        assert!(call.require_string("content").is_err());
        assert_eq!(call.arguments_json()["path"], "/tmp/a.txt");
    }
}
