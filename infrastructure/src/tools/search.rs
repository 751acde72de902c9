//! Search tools: search_codebase (content regex), find_files (glob)

use glob::{MatchOptions, Pattern, glob_with};
use regex::RegexBuilder;
use shipwright_domain::tool::{
    ExecutionContext, RiskLevel, ToolCall, ToolDefinition, ToolError, ToolKind, ToolParameter,
    ToolResult, ToolResultMetadata,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

pub const SEARCH_CODEBASE: &str = "search_codebase";
pub const FIND_FILES: &str = "find_files";

const MAX_MATCHES: usize = 200;
const MAX_FIND_RESULTS: usize = 1000;

/// Files larger than this are skipped by content search (5 MiB)
const MAX_SEARCH_FILE_SIZE: u64 = 5 * 1024 * 1024;

pub fn search_codebase_definition() -> ToolDefinition {
    ToolDefinition::new(
        SEARCH_CODEBASE,
        "Search file contents with a regular expression",
        RiskLevel::Low,
    )
    .with_kind(ToolKind::Read)
    .with_parameter(ToolParameter::new("pattern", "Regex pattern to search for", true))
    .with_parameter(
        ToolParameter::new("path", "File or directory to search (defaults to the working directory)", false)
            .with_type("path"),
    )
    .with_parameter(ToolParameter::new(
        "file_pattern",
        "Glob applied to file names (e.g. '*.rs')",
        false,
    ))
    .with_parameter(
        ToolParameter::new("case_insensitive", "Ignore case when matching", false)
            .with_type("boolean"),
    )
}

pub fn find_files_definition() -> ToolDefinition {
    ToolDefinition::new(
        FIND_FILES,
        "Find files by glob pattern relative to the working directory (e.g. '**/*.rs')",
        RiskLevel::Low,
    )
    .with_kind(ToolKind::Read)
    .with_parameter(ToolParameter::new("pattern", "Glob pattern to match", true))
}

pub fn execute_search_codebase(call: &ToolCall, ctx: &ExecutionContext) -> ToolResult {
    let start = Instant::now();

    let pattern = match call.require_string("pattern") {
        Ok(p) => p,
        Err(e) => return ToolResult::failure(SEARCH_CODEBASE, ToolError::invalid_argument(e)),
    };

    let regex = match RegexBuilder::new(pattern)
        .case_insensitive(call.get_bool("case_insensitive").unwrap_or(false))
        .build()
    {
        Ok(r) => r,
        Err(e) => {
            return ToolResult::failure(
                SEARCH_CODEBASE,
                ToolError::invalid_argument(format!("Invalid regex pattern: {}", e)),
            );
        }
    };

    let file_pattern = match call.get_string("file_pattern").map(Pattern::new).transpose() {
        Ok(p) => p,
        Err(e) => {
            return ToolResult::failure(
                SEARCH_CODEBASE,
                ToolError::invalid_argument(format!("Invalid file pattern: {}", e)),
            );
        }
    };

    let root = ctx.resolve(call.get_string("path").unwrap_or(""));
    if !root.exists() {
        return ToolResult::failure(
            SEARCH_CODEBASE,
            ToolError::not_found(root.display().to_string()),
        );
    }

    let files = if root.is_file() {
        vec![root.clone()]
    } else {
        let mut files = Vec::new();
        collect_files(&root, file_pattern.as_ref(), &mut files);
        files
    };

    let mut matches = Vec::new();
    let mut truncated = false;

    'files: for file in files {
        if fs::metadata(&file).map_or(true, |m| m.len() > MAX_SEARCH_FILE_SIZE) {
            continue;
        }
        // binary and non-UTF-8 files are skipped
        let Ok(content) = fs::read_to_string(&file) else {
            continue;
        };
        let display = display_relative(&file, ctx.working_dir());

        for (index, line) in content.lines().enumerate() {
            if regex.is_match(line) {
                if matches.len() >= MAX_MATCHES {
                    truncated = true;
                    break 'files;
                }
                matches.push(format!("{}:{}: {}", display, index + 1, line.trim_end()));
            }
        }
    }

    let count = matches.len();
    let output = if matches.is_empty() {
        "No matches found".to_string()
    } else if truncated {
        format!("{}\n... (limited to {} matches)", matches.join("\n"), MAX_MATCHES)
    } else {
        matches.join("\n")
    };

    ToolResult::success(SEARCH_CODEBASE, output).with_metadata(ToolResultMetadata {
        duration_ms: Some(start.elapsed().as_millis() as u64),
        match_count: Some(count),
        truncated,
        ..Default::default()
    })
}

pub fn execute_find_files(call: &ToolCall, ctx: &ExecutionContext) -> ToolResult {
    let start = Instant::now();

    let pattern = match call.require_string("pattern") {
        Ok(p) => p,
        Err(e) => return ToolResult::failure(FIND_FILES, ToolError::invalid_argument(e)),
    };

    let full_pattern = if Path::new(pattern).is_absolute() {
        pattern.to_string()
    } else {
        format!("{}/{}", ctx.working_dir().display(), pattern)
    };

    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..Default::default()
    };
    let entries = match glob_with(&full_pattern, options) {
        Ok(paths) => paths,
        Err(e) => {
            return ToolResult::failure(
                FIND_FILES,
                ToolError::invalid_argument(format!("Invalid glob pattern: {}", e)),
            );
        }
    };

    let mut results = Vec::new();
    let mut truncated = false;
    for path in entries.flatten() {
        if results.len() >= MAX_FIND_RESULTS {
            truncated = true;
            break;
        }
        results.push(display_relative(&path, ctx.working_dir()));
    }

    let count = results.len();
    let output = if results.is_empty() {
        "No files found matching the pattern".to_string()
    } else if truncated {
        format!("{}\n... (limited to {} results)", results.join("\n"), MAX_FIND_RESULTS)
    } else {
        results.join("\n")
    };

    ToolResult::success(FIND_FILES, output).with_metadata(ToolResultMetadata {
        duration_ms: Some(start.elapsed().as_millis() as u64),
        match_count: Some(count),
        truncated,
        ..Default::default()
    })
}

/// Depth-first walk in name order, skipping dot-prefixed directories.
fn collect_files(dir: &Path, file_pattern: Option<&Pattern>, out: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    let mut entries: Vec<_> = entries.flatten().collect();
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };

        if file_type.is_dir() {
            if !name.starts_with('.') {
                collect_files(&entry.path(), file_pattern, out);
            }
        } else if file_type.is_file() && file_pattern.is_none_or(|p| p.matches(&name)) {
            out.push(entry.path());
        }
    }
}

fn display_relative(path: &Path, working_dir: &Path) -> String {
    path.strip_prefix(working_dir)
        .unwrap_or(path)
        .display()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shipwright_domain::safety::SafetyPolicy;
    use shipwright_domain::tool::NeverConfirm;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src/nested")).unwrap();
        fs::create_dir_all(dir.path().join(".git")).unwrap();
        fs::write(dir.path().join("src/lib.rs"), "fn alpha() {}\n// TODO: beta\n").unwrap();
        fs::write(dir.path().join("src/nested/util.rs"), "fn todo_later() {}\n").unwrap();
        fs::write(dir.path().join("notes.md"), "TODO: write docs\n").unwrap();
        fs::write(dir.path().join(".git/config"), "TODO hidden\n").unwrap();
        dir
    }

    fn ctx(dir: &TempDir) -> ExecutionContext {
        ExecutionContext::new(
            dir.path(),
            Arc::new(NeverConfirm),
            Arc::new(SafetyPolicy::default()),
        )
    }

    #[test]
    fn test_search_skips_dot_dirs() {
        let dir = fixture();
        let call = ToolCall::new(SEARCH_CODEBASE).with_arg("pattern", "TODO");

        let result = execute_search_codebase(&call, &ctx(&dir));
        let output = result.output().unwrap();

        assert_eq!(result.metadata.match_count, Some(2));
        assert!(output.contains("notes.md:1: TODO: write docs"));
        assert!(output.contains("src/lib.rs:2: // TODO: beta"));
        assert!(!output.contains(".git"));
    }

    #[test]
    fn test_search_case_insensitive_with_file_pattern() {
        let dir = fixture();
        let call = ToolCall::new(SEARCH_CODEBASE)
            .with_arg("pattern", "todo")
            .with_arg("file_pattern", "*.rs")
            .with_arg("case_insensitive", true);

        let result = execute_search_codebase(&call, &ctx(&dir));

        assert_eq!(result.metadata.match_count, Some(2));
        assert!(!result.output().unwrap().contains("notes.md"));
    }

    #[test]
    fn test_search_invalid_regex() {
        let dir = fixture();
        let call = ToolCall::new(SEARCH_CODEBASE).with_arg("pattern", "(unclosed");
        let result = execute_search_codebase(&call, &ctx(&dir));
        assert!(!result.is_success());
    }

    #[test]
    fn test_search_caps_matches() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("big.txt"), "hit\n".repeat(MAX_MATCHES + 10)).unwrap();

        let call = ToolCall::new(SEARCH_CODEBASE).with_arg("pattern", "hit");
        let result = execute_search_codebase(&call, &ctx(&dir));

        assert_eq!(result.metadata.match_count, Some(MAX_MATCHES));
        assert!(result.metadata.truncated);
    }

    #[test]
    fn test_find_files_relative_to_working_dir() {
        let dir = fixture();
        let call = ToolCall::new(FIND_FILES).with_arg("pattern", "**/*.rs");

        let result = execute_find_files(&call, &ctx(&dir));
        let output = result.output().unwrap();

        assert_eq!(result.metadata.match_count, Some(2));
        assert!(output.contains("src/lib.rs"));
        assert!(output.contains("src/nested/util.rs"));
    }

    #[test]
    fn test_find_files_no_match() {
        let dir = fixture();
        let call = ToolCall::new(FIND_FILES).with_arg("pattern", "*.py");
        let result = execute_find_files(&call, &ctx(&dir));

        assert!(result.is_success());
        assert_eq!(result.metadata.match_count, Some(0));
    }
}
