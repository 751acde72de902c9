//! Tool domain value objects: immutable result and error types
//!
//! Every capability invocation produces a [`ToolResult`]. Failures never
//! escape the dispatcher as Rust errors: they are carried in
//! [`ToolResult::error`] and fed back to the model as observations.

use serde::{Deserialize, Serialize};

/// Stable error codes carried by [`ToolError`].
pub mod codes {
    /// Unknown tool, or a resource the tool was pointed at does not exist
    pub const NOT_FOUND: &str = "NOT_FOUND";
    /// Tool is outside the invoking agent's allow-list
    pub const PERMISSION_DENIED: &str = "PERMISSION_DENIED";
    /// Unexpected failure while the tool ran
    pub const EXECUTION_FAILED: &str = "EXECUTION_FAILED";
    /// The user declined the confirmation prompt
    pub const CANCELLED: &str = "CANCELLED";
    /// The safety policy refused the invocation
    pub const BLOCKED: &str = "BLOCKED";
    /// Missing or malformed arguments
    pub const INVALID_ARGUMENT: &str = "INVALID_ARGUMENT";
}

/// Error that occurred during tool execution.
///
/// | Code | Raised by |
/// |------|-----------|
/// | `NOT_FOUND` | dispatcher (unknown tool), tools (missing file) |
/// | `PERMISSION_DENIED` | dispatcher (agent allow-list), tools (OS permission) |
/// | `EXECUTION_FAILED` | tools, delegated servers |
/// | `CANCELLED` | safety gate, when confirmation is declined |
/// | `BLOCKED` | safety gate, path or whitelist policy |
/// | `INVALID_ARGUMENT` | argument validation |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolError {
    /// Error code (see [`codes`])
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl ToolError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            codes::NOT_FOUND,
            format!("Resource not found: {}", resource.into()),
        )
    }

    pub fn tool_not_found(tool_name: impl Into<String>) -> Self {
        Self::new(
            codes::NOT_FOUND,
            format!("Tool not found: {}", tool_name.into()),
        )
    }

    pub fn permission_denied(resource: impl Into<String>) -> Self {
        Self::new(
            codes::PERMISSION_DENIED,
            format!("Permission denied: {}", resource.into()),
        )
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(codes::INVALID_ARGUMENT, message)
    }

    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::new(codes::EXECUTION_FAILED, message)
    }

    /// Confirmation declined by the user.
    pub fn cancelled() -> Self {
        Self::new(codes::CANCELLED, "cancelled")
    }

    pub fn blocked(reason: impl Into<String>) -> Self {
        Self::new(codes::BLOCKED, reason)
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ToolError {}

/// Result of a tool execution, carrying output or error information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Name of the tool that was executed
    pub tool_name: String,
    /// Whether the execution was successful
    pub success: bool,
    /// Output content (for successful execution)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Error information (for failed execution)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolError>,
    /// Metadata about the execution
    #[serde(default)]
    pub metadata: ToolResultMetadata,
}

/// Structured metadata about tool execution.
///
/// | Tool | `duration_ms` | `bytes` | `path` | `exit_code` | `match_count` | `truncated` |
/// |------|:---:|:---:|:---:|:---:|:---:|:---:|
/// | `read_file` | yes | yes | yes | - | - | - |
/// | `write_file` | - | yes | yes | - | - | - |
/// | `delete_file` | - | - | yes | - | - | - |
/// | `list_files` | - | - | yes | - | yes | - |
/// | `run_command` | yes | yes | - | yes | - | yes |
/// | `search_codebase` | yes | - | - | - | yes | yes |
/// | `find_files` | yes | - | - | - | yes | yes |
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResultMetadata {
    /// Duration of execution in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    /// Number of bytes processed/returned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<usize>,
    /// For file operations: the affected path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// For command execution: exit code (absent when the process was killed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    /// For search and listing operations: number of entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_count: Option<usize>,
    /// Output was cut short (size cap or timeout)
    #[serde(default)]
    pub truncated: bool,
}

impl ToolResult {
    /// Create a successful result
    pub fn success(tool_name: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: true,
            output: Some(output.into()),
            error: None,
            metadata: ToolResultMetadata::default(),
        }
    }

    /// Create a failed result
    pub fn failure(tool_name: impl Into<String>, error: ToolError) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: false,
            output: None,
            error: Some(error),
            metadata: ToolResultMetadata::default(),
        }
    }

    /// Add metadata to the result
    pub fn with_metadata(mut self, metadata: ToolResultMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Add path metadata
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.metadata.path = Some(path.into());
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    pub fn error(&self) -> Option<&ToolError> {
        self.error.as_ref()
    }

    /// Error message, if any (e.g. `"cancelled"`).
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.message.as_str())
    }

    /// Text the model sees for this result.
    pub fn observation(&self) -> String {
        if self.success {
            self.output.clone().unwrap_or_default()
        } else {
            match &self.error {
                Some(e) => format!("Error: {}", e.message),
                None => "Error: unknown failure".to_string(),
            }
        }
    }
}
