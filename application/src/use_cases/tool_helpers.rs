//! Shared helpers for tool use cases.

use shipwright_domain::tool::ToolCall;

const PREVIEW_LEN: usize = 60;

/// Short preview of a call's arguments for prompts and progress lines.
///
/// Prefers the well-known keys (`path`, `command`, `pattern`, `query`),
/// then the first string value, then the compact JSON of all arguments.
pub(crate) fn tool_args_preview(call: &ToolCall) -> String {
    for key in ["path", "command", "pattern", "query"] {
        if let Some(s) = call.get_string(key) {
            return truncate_preview(s, PREVIEW_LEN);
        }
    }
    let mut keys: Vec<_> = call.arguments.keys().collect();
    keys.sort();
    if let Some(s) = keys.into_iter().find_map(|k| call.arguments[k].as_str()) {
        return truncate_preview(s, PREVIEW_LEN);
    }
    if call.arguments.is_empty() {
        return String::new();
    }
    truncate_preview(&call.arguments_json().to_string(), PREVIEW_LEN)
}

fn truncate_preview(s: &str, max_len: usize) -> String {
    let s = s.lines().next().unwrap_or("");
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_key_preferred() {
        let call = ToolCall::new("write_file")
            .with_arg("content", "fn main() {}")
            .with_arg("path", "src/main.rs");
        assert_eq!(tool_args_preview(&call), "src/main.rs");
    }

    #[test]
    fn test_command_key() {
        let call = ToolCall::new("run_command").with_arg("command", "cargo test");
        assert_eq!(tool_args_preview(&call), "cargo test");
    }

    #[test]
    fn test_fallback_to_first_string_by_key() {
        let call = ToolCall::new("notify")
            .with_arg("zeta", "last")
            .with_arg("alpha", "first");
        assert_eq!(tool_args_preview(&call), "first");
    }

    #[test]
    fn test_non_string_args_render_as_json() {
        let call = ToolCall::new("sleep").with_arg("secs", 3);
        assert_eq!(tool_args_preview(&call), r#"{"secs":3}"#);
        assert_eq!(tool_args_preview(&ToolCall::new("noop")), "");
    }

    #[test]
    fn test_truncation_keeps_first_line() {
        let long = format!("{}\nsecond line", "a".repeat(100));
        let call = ToolCall::new("run_command").with_arg("command", long);
        let preview = tool_args_preview(&call);
        assert_eq!(preview.chars().count(), PREVIEW_LEN);
        assert!(preview.ends_with('…'));
        assert!(!preview.contains("second"));
    }
}
