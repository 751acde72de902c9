//! Builtin tool provider
//!
//! The in-process tool set. It is flagged builtin, so the registry lets it
//! shadow any delegated tool with the same name.

use std::time::Duration;

use async_trait::async_trait;
use shipwright_domain::tool::{
    DefaultToolValidator, ExecutionContext, ToolCall, ToolDefinition, ToolError, ToolProvider,
    ToolProviderError, ToolResult, ToolSpec, ToolValidator,
};

use super::{command, file, search};

pub const BUILTIN_PROVIDER_ID: &str = "builtin";

/// Every builtin tool, in listing order.
pub fn builtin_tool_spec() -> ToolSpec {
    ToolSpec::new()
        .register(file::read_file_definition())
        .register(file::list_files_definition())
        .register(search::search_codebase_definition())
        .register(search::find_files_definition())
        .register(file::write_file_definition())
        .register(file::delete_file_definition())
        .register(command::run_command_definition())
}

#[derive(Debug, Clone)]
pub struct BuiltinProvider {
    tool_spec: ToolSpec,
    command_timeout: Duration,
}

impl BuiltinProvider {
    pub fn new() -> Self {
        Self {
            tool_spec: builtin_tool_spec(),
            command_timeout: Duration::from_secs(command::DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Default `run_command` timeout when the call does not pass `timeout_secs`.
    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    pub fn tool_spec(&self) -> &ToolSpec {
        &self.tool_spec
    }

    async fn execute_internal(
        &self,
        call: &ToolCall,
        ctx: &ExecutionContext,
    ) -> Result<ToolResult, ToolProviderError> {
        let definition = self
            .tool_spec
            .get(&call.tool_name)
            .ok_or_else(|| ToolProviderError::ToolNotFound(call.tool_name.clone()))?;

        if let Err(e) = DefaultToolValidator.validate(call, definition) {
            return Ok(ToolResult::failure(
                &call.tool_name,
                ToolError::invalid_argument(e),
            ));
        }

        let result = match call.tool_name.as_str() {
            file::READ_FILE => file::execute_read_file(call, ctx),
            file::WRITE_FILE => file::execute_write_file(call, ctx),
            file::DELETE_FILE => file::execute_delete_file(call, ctx),
            file::LIST_FILES => file::execute_list_files(call, ctx),
            search::SEARCH_CODEBASE => search::execute_search_codebase(call, ctx),
            search::FIND_FILES => search::execute_find_files(call, ctx),
            command::RUN_COMMAND => {
                command::execute_run_command(call, ctx, self.command_timeout).await
            }
            _ => return Err(ToolProviderError::ToolNotFound(call.tool_name.clone())),
        };

        Ok(result)
    }
}

impl Default for BuiltinProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolProvider for BuiltinProvider {
    fn id(&self) -> &str {
        BUILTIN_PROVIDER_ID
    }

    fn display_name(&self) -> &str {
        "Built-in Tools"
    }

    fn is_builtin(&self) -> bool {
        true
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn discover_tools(&self) -> Result<Vec<ToolDefinition>, ToolProviderError> {
        Ok(self.tool_spec.all().cloned().collect())
    }

    async fn execute(&self, call: &ToolCall, ctx: &ExecutionContext) -> ToolResult {
        match self.execute_internal(call, ctx).await {
            Ok(result) => result,
            Err(ToolProviderError::ToolNotFound(name)) => {
                ToolResult::failure(&call.tool_name, ToolError::tool_not_found(name))
            }
            Err(e) => ToolResult::failure(
                &call.tool_name,
                ToolError::execution_failed(e.to_string()),
            ),
        }
    }
}
