//! File tools: read_file, write_file, delete_file, list_files

use shipwright_domain::tool::{
    ExecutionContext, RiskLevel, ToolCall, ToolDefinition, ToolError, ToolKind, ToolParameter,
    ToolResult, ToolResultMetadata,
};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Instant;

pub const READ_FILE: &str = "read_file";
pub const WRITE_FILE: &str = "write_file";
pub const DELETE_FILE: &str = "delete_file";
pub const LIST_FILES: &str = "list_files";

/// Maximum file size to read (10 MiB)
const MAX_READ_SIZE: u64 = 10 * 1024 * 1024;

pub fn read_file_definition() -> ToolDefinition {
    ToolDefinition::new(
        READ_FILE,
        "Read the contents of a UTF-8 text file",
        RiskLevel::Low,
    )
    .with_kind(ToolKind::Read)
    .with_parameter(ToolParameter::new("path", "Path to the file to read", true).with_type("path"))
    .with_parameter(
        ToolParameter::new("offset", "Line number to start reading from (0-indexed)", false)
            .with_type("integer"),
    )
    .with_parameter(
        ToolParameter::new("limit", "Maximum number of lines to read", false).with_type("integer"),
    )
}

pub fn write_file_definition() -> ToolDefinition {
    ToolDefinition::new(
        WRITE_FILE,
        "Write content to a file, creating it or overwriting it",
        RiskLevel::Medium,
    )
    .with_kind(ToolKind::Write)
    .with_parameter(ToolParameter::new("path", "Path to the file to write", true).with_type("path"))
    .with_parameter(ToolParameter::new("content", "Content to write to the file", true))
    .with_parameter(
        ToolParameter::new("create_dirs", "Create missing parent directories", false)
            .with_type("boolean"),
    )
}

pub fn delete_file_definition() -> ToolDefinition {
    ToolDefinition::new(
        DELETE_FILE,
        "Delete a file, or a directory when recursive is true",
        RiskLevel::High,
    )
    .with_kind(ToolKind::Delete)
    .with_parameter(ToolParameter::new("path", "Path to delete", true).with_type("path"))
    .with_parameter(
        ToolParameter::new("recursive", "Delete a directory and everything in it", false)
            .with_type("boolean"),
    )
}

pub fn list_files_definition() -> ToolDefinition {
    ToolDefinition::new(
        LIST_FILES,
        "List a directory: subdirectories first (suffixed with /), then files",
        RiskLevel::Low,
    )
    .with_kind(ToolKind::Read)
    .with_parameter(
        ToolParameter::new("path", "Directory to list (defaults to the working directory)", false)
            .with_type("path"),
    )
}

fn io_failure(tool: &str, path: &str, action: &str, e: std::io::Error) -> ToolResult {
    let error = match e.kind() {
        ErrorKind::NotFound => ToolError::not_found(path),
        ErrorKind::PermissionDenied => ToolError::permission_denied(path),
        _ => ToolError::execution_failed(format!("Failed to {}: {}", action, e)),
    };
    ToolResult::failure(tool, error)
}

pub fn execute_read_file(call: &ToolCall, ctx: &ExecutionContext) -> ToolResult {
    let start = Instant::now();

    let raw = match call.require_string("path") {
        Ok(p) => p,
        Err(e) => return ToolResult::failure(READ_FILE, ToolError::invalid_argument(e)),
    };
    let path = ctx.resolve(raw);
    let display = path.display().to_string();

    let metadata = match fs::metadata(&path) {
        Ok(m) => m,
        Err(e) => return io_failure(READ_FILE, &display, "read file metadata", e),
    };

    if !metadata.is_file() {
        return ToolResult::failure(
            READ_FILE,
            ToolError::invalid_argument(format!("'{}' is not a file", display)),
        );
    }

    if metadata.len() > MAX_READ_SIZE {
        return ToolResult::failure(
            READ_FILE,
            ToolError::invalid_argument(format!(
                "File too large ({} bytes). Maximum size is {} bytes",
                metadata.len(),
                MAX_READ_SIZE
            )),
        );
    }

    let content = match fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) if e.kind() == ErrorKind::InvalidData => {
            return ToolResult::failure(
                READ_FILE,
                ToolError::invalid_argument(format!("'{}' is not valid UTF-8", display)),
            );
        }
        Err(e) => return io_failure(READ_FILE, &display, "read file", e),
    };

    let offset = call.get_i64("offset").unwrap_or(0).max(0) as usize;
    let limit = call.get_i64("limit").map(|l| l.max(0) as usize);

    let output = if offset > 0 || limit.is_some() {
        let lines: Vec<&str> = content.lines().collect();
        let total = lines.len();
        if offset >= total {
            String::new()
        } else {
            let end = limit.map_or(total, |l| (offset + l).min(total));
            lines[offset..end].join("\n")
        }
    } else {
        content
    };

    let bytes = output.len();
    ToolResult::success(READ_FILE, output).with_metadata(ToolResultMetadata {
        duration_ms: Some(start.elapsed().as_millis() as u64),
        bytes: Some(bytes),
        path: Some(display),
        ..Default::default()
    })
}

pub fn execute_write_file(call: &ToolCall, ctx: &ExecutionContext) -> ToolResult {
    let raw = match call.require_string("path") {
        Ok(p) => p,
        Err(e) => return ToolResult::failure(WRITE_FILE, ToolError::invalid_argument(e)),
    };
    let content = match call.require_string("content") {
        Ok(c) => c,
        Err(e) => return ToolResult::failure(WRITE_FILE, ToolError::invalid_argument(e)),
    };
    let path = ctx.resolve(raw);
    let display = path.display().to_string();

    if let Some(parent) = path.parent()
        && !parent.exists()
    {
        if call.get_bool("create_dirs").unwrap_or(false) {
            if let Err(e) = fs::create_dir_all(parent) {
                return io_failure(WRITE_FILE, &display, "create parent directories", e);
            }
        } else {
            return ToolResult::failure(
                WRITE_FILE,
                ToolError::not_found(format!(
                    "Parent directory does not exist: {}",
                    parent.display()
                )),
            );
        }
    }

    let bytes = content.len();
    if let Err(e) = fs::write(&path, content) {
        return io_failure(WRITE_FILE, &display, "write file", e);
    }

    ToolResult::success(
        WRITE_FILE,
        format!("Wrote {} bytes to {}", bytes, display),
    )
    .with_metadata(ToolResultMetadata {
        bytes: Some(bytes),
        path: Some(display),
        ..Default::default()
    })
}

pub fn execute_delete_file(call: &ToolCall, ctx: &ExecutionContext) -> ToolResult {
    let raw = match call.require_string("path") {
        Ok(p) => p,
        Err(e) => return ToolResult::failure(DELETE_FILE, ToolError::invalid_argument(e)),
    };
    let path = ctx.resolve(raw);
    let display = path.display().to_string();

    let metadata = match fs::symlink_metadata(&path) {
        Ok(m) => m,
        Err(e) => return io_failure(DELETE_FILE, &display, "stat path", e),
    };

    let outcome = if metadata.is_dir() {
        if !call.get_bool("recursive").unwrap_or(false) {
            return ToolResult::failure(
                DELETE_FILE,
                ToolError::invalid_argument(format!(
                    "'{}' is a directory; pass recursive: true to delete it",
                    display
                )),
            );
        }
        fs::remove_dir_all(&path)
    } else {
        fs::remove_file(&path)
    };

    match outcome {
        Ok(()) => ToolResult::success(DELETE_FILE, format!("Deleted {}", display)).with_path(display),
        Err(e) => io_failure(DELETE_FILE, &display, "delete", e),
    }
}

pub fn execute_list_files(call: &ToolCall, ctx: &ExecutionContext) -> ToolResult {
    let path = ctx.resolve(call.get_string("path").unwrap_or(""));
    let display = path.display().to_string();

    let entries = match fs::read_dir(&path) {
        Ok(entries) => entries,
        Err(e) => return io_failure(LIST_FILES, &display, "list directory", e),
    };

    let mut dirs = Vec::new();
    let mut files = Vec::new();
    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        if is_dir(&entry.path()) {
            dirs.push(format!("{}/", name));
        } else {
            files.push(name);
        }
    }
    dirs.sort();
    files.sort();

    let count = dirs.len() + files.len();
    let output = dirs.into_iter().chain(files).collect::<Vec<_>>().join("\n");

    ToolResult::success(LIST_FILES, output).with_metadata(ToolResultMetadata {
        path: Some(display),
        match_count: Some(count),
        ..Default::default()
    })
}

fn is_dir(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shipwright_domain::safety::SafetyPolicy;
    use shipwright_domain::tool::{NeverConfirm, codes};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn ctx(dir: &TempDir) -> ExecutionContext {
        ExecutionContext::new(
            dir.path(),
            Arc::new(NeverConfirm),
            Arc::new(SafetyPolicy::default()),
        )
    }

    #[test]
    fn test_read_file_relative_to_working_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("notes.txt"), "Hello, World!").unwrap();

        let call = ToolCall::new(READ_FILE).with_arg("path", "notes.txt");
        let result = execute_read_file(&call, &ctx(&dir));

        assert!(result.is_success());
        assert_eq!(result.output(), Some("Hello, World!"));
        assert_eq!(result.metadata.bytes, Some(13));
    }

    #[test]
    fn test_read_file_with_offset_and_limit() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("lines.txt"), "one\ntwo\nthree\nfour\nfive").unwrap();

        let call = ToolCall::new(READ_FILE)
            .with_arg("path", "lines.txt")
            .with_arg("offset", 1)
            .with_arg("limit", 2);
        let result = execute_read_file(&call, &ctx(&dir));

        assert_eq!(result.output(), Some("two\nthree"));
    }

    #[test]
    fn test_read_missing_file() {
        let dir = TempDir::new().unwrap();
        let call = ToolCall::new(READ_FILE).with_arg("path", "nope.txt");
        let result = execute_read_file(&call, &ctx(&dir));

        assert_eq!(result.error().unwrap().code, codes::NOT_FOUND);
    }

    #[test]
    fn test_write_file_create_dirs() {
        let dir = TempDir::new().unwrap();
        let call = ToolCall::new(WRITE_FILE)
            .with_arg("path", "a/b/c.txt")
            .with_arg("content", "nested")
            .with_arg("create_dirs", true);

        let result = execute_write_file(&call, &ctx(&dir));

        assert!(result.is_success());
        assert_eq!(
            fs::read_to_string(dir.path().join("a/b/c.txt")).unwrap(),
            "nested"
        );
    }

    #[test]
    fn test_write_file_missing_parent() {
        let dir = TempDir::new().unwrap();
        let call = ToolCall::new(WRITE_FILE)
            .with_arg("path", "missing/c.txt")
            .with_arg("content", "x");

        let result = execute_write_file(&call, &ctx(&dir));
        assert_eq!(result.error().unwrap().code, codes::NOT_FOUND);
    }

    #[test]
    fn test_delete_directory_requires_recursive() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("build/out")).unwrap();
        fs::write(dir.path().join("build/out/a.o"), "").unwrap();

        let plain = ToolCall::new(DELETE_FILE).with_arg("path", "build");
        let result = execute_delete_file(&plain, &ctx(&dir));
        assert_eq!(result.error().unwrap().code, codes::INVALID_ARGUMENT);

        let recursive = plain.with_arg("recursive", true);
        assert!(execute_delete_file(&recursive, &ctx(&dir)).is_success());
        assert!(!dir.path().join("build").exists());
    }

    #[test]
    fn test_list_files_dirs_first_without_dot_entries() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("src")).unwrap();
        fs::create_dir(dir.path().join("docs")).unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        fs::write(dir.path().join("README.md"), "").unwrap();
        fs::write(dir.path().join("Cargo.toml"), "").unwrap();
        fs::write(dir.path().join(".env"), "").unwrap();

        let result = execute_list_files(&ToolCall::new(LIST_FILES), &ctx(&dir));

        assert_eq!(result.output(), Some("docs/\nsrc/\nCargo.toml\nREADME.md"));
        assert_eq!(result.metadata.match_count, Some(4));
    }
}
