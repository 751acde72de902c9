//! Canonical conversation entities

use crate::core::string::{single_line, truncate};
use crate::tool::entities::ToolCall;
use crate::tool::value_objects::ToolResult;
use serde::{Deserialize, Serialize};

/// Longest per-call outcome kept in a tool message's summary text.
const SUMMARY_OUTCOME_LEN: usize = 200;

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }
}

/// The outcome of one tool call inside a folded tool message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResultRecord {
    /// Id of the call in the preceding assistant message
    pub tool_call_id: String,
    pub tool_name: String,
    pub result: ToolResult,
}

impl ToolResultRecord {
    pub fn new(call: &ToolCall, result: ToolResult) -> Self {
        Self {
            tool_call_id: call.id.clone(),
            tool_name: call.tool_name.clone(),
            result,
        }
    }

    /// One summary line: `- name: ok (...)` or `- name: error: ...`
    fn summary_line(&self) -> String {
        let outcome = if self.result.success {
            let output = single_line(self.result.output().unwrap_or(""));
            if output.is_empty() {
                "ok".to_string()
            } else {
                format!("ok ({})", truncate(&output, SUMMARY_OUTCOME_LEN))
            }
        } else {
            format!(
                "error: {}",
                truncate(self.result.error_message().unwrap_or("unknown"), SUMMARY_OUTCOME_LEN)
            )
        };
        format!("- {}: {}", self.tool_name, outcome)
    }
}

/// Backend-agnostic conversation unit.
///
/// A `Tool` message holds the results of every call from the preceding
/// assistant turn, folded together; provider adapters fan them back out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// Calls requested by an assistant message
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    /// Results carried by a tool message
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_results: Vec<ToolResultRecord>,
}

impl Message {
    fn plain(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_results: Vec::new(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::plain(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::plain(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::plain(Role::Assistant, content)
    }

    pub fn assistant_with_tool_calls(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            tool_calls,
            ..Self::plain(Role::Assistant, content)
        }
    }

    /// Fold one round of results into a single tool message.
    pub fn tool_results(results: Vec<ToolResultRecord>) -> Self {
        let content = results
            .iter()
            .map(ToolResultRecord::summary_line)
            .collect::<Vec<_>>()
            .join("\n");
        Self {
            tool_results: results,
            ..Self::plain(Role::Tool, content)
        }
    }

    /// Id of the first call this tool message answers.
    pub fn tool_call_id(&self) -> Option<&str> {
        self.tool_results.first().map(|r| r.tool_call_id.as_str())
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::value_objects::ToolError;

    #[test]
    fn test_tool_message_folds_all_results() {
        let read = ToolCall::new("read_file").with_id("c1");
        let write = ToolCall::new("write_file").with_id("c2");

        let message = Message::tool_results(vec![
            ToolResultRecord::new(&read, ToolResult::success("read_file", "line one\nline two")),
            ToolResultRecord::new(&write, ToolResult::failure("write_file", ToolError::cancelled())),
        ]);

        assert_eq!(message.role, Role::Tool);
        assert_eq!(message.tool_call_id(), Some("c1"));
        assert_eq!(message.tool_results.len(), 2);
        assert_eq!(
            message.content,
            "- read_file: ok (line one line two)\n- write_file: error: cancelled"
        );
    }

    #[test]
    fn test_empty_success_summarizes_as_ok() {
        let call = ToolCall::new("delete_file").with_id("c9");
        let message = Message::tool_results(vec![ToolResultRecord::new(
            &call,
            ToolResult::success("delete_file", ""),
        )]);
        assert_eq!(message.content, "- delete_file: ok");
    }

    #[test]
    fn test_assistant_with_tool_calls() {
        let message = Message::assistant_with_tool_calls(
            "Let me look.",
            vec![ToolCall::new("list_files").with_id("c1")],
        );
        assert!(message.has_tool_calls());
        assert_eq!(message.tool_call_id(), None);
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Role::Tool).unwrap(), "tool");
        assert_eq!(Role::Assistant.as_str(), "assistant");
    }
}
