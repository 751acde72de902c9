//! Specialized sub-agent presets and `@token` directive parsing.

use super::entities::{AgentConfig, ToolAccess};

/// Prefix marking a sub-agent directive in user input.
pub const DIRECTIVE_PREFIX: char = '@';

const READ_TOOLS: [&str; 4] = ["read_file", "list_files", "search_codebase", "find_files"];

/// Static definition of a specialized agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubAgentPreset {
    /// Directive token (`@test` selects `test`)
    pub token: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub system_prompt: &'static str,
    /// Capabilities beyond the read-only set
    pub extra_tools: &'static [&'static str],
    pub max_loops: usize,
}

impl SubAgentPreset {
    /// Full allow-list: the read-only tools followed by the extras.
    pub fn tool_names(&self) -> Vec<&'static str> {
        READ_TOOLS
            .iter()
            .chain(self.extra_tools.iter())
            .copied()
            .collect()
    }

    pub fn to_config(&self) -> AgentConfig {
        AgentConfig::new(self.token, self.name, self.system_prompt)
            .with_tools(ToolAccess::only(self.tool_names()))
            .with_max_loops(self.max_loops)
    }
}

pub static PRESETS: [SubAgentPreset; 5] = [
    SubAgentPreset {
        token: "test",
        name: "Test Writer",
        description: "Writes and runs tests",
        system_prompt: "You are a testing specialist. Read the code under test, write focused \
unit tests that follow the project's existing conventions, run them, and fix failures you \
introduced. Finish with a short summary of what is covered.",
        extra_tools: &["write_file", "run_command"],
        max_loops: 10,
    },
    SubAgentPreset {
        token: "review",
        name: "Code Reviewer",
        description: "Reviews code without modifying it",
        system_prompt: "You are a careful code reviewer. Inspect the relevant files and report \
bugs, risky patterns, and readability problems, ordered by severity, each with a file \
reference. Do not modify anything.",
        extra_tools: &[],
        max_loops: 8,
    },
    SubAgentPreset {
        token: "docs",
        name: "Documentation Writer",
        description: "Writes and updates documentation",
        system_prompt: "You are a technical writer. Read the code, then write or update \
documentation that is accurate, concise, and consistent with the existing docs.",
        extra_tools: &["write_file"],
        max_loops: 8,
    },
    SubAgentPreset {
        token: "refactor",
        name: "Refactorer",
        description: "Restructures code without changing behavior",
        system_prompt: "You are a refactoring specialist. Improve structure and naming without \
changing behavior. Make small steps and run the build or tests after each change.",
        extra_tools: &["write_file", "run_command"],
        max_loops: 12,
    },
    SubAgentPreset {
        token: "debug",
        name: "Debugger",
        description: "Investigates failures and reports root causes",
        system_prompt: "You are a debugging specialist. Reproduce the problem, narrow it down \
by reading code and running commands, and report the root cause with a proposed fix.",
        extra_tools: &["run_command"],
        max_loops: 10,
    },
];

pub fn find_preset(token: &str) -> Option<&'static SubAgentPreset> {
    PRESETS.iter().find(|p| p.token == token)
}

/// A recognized sub-agent directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive<'a> {
    pub preset: &'static SubAgentPreset,
    /// Input after the token, trimmed. Never empty.
    pub task: &'a str,
}

/// Parse `@token rest of message`.
///
/// Returns `None` for unknown tokens and for directives with nothing after
/// the token; such input is handled as an ordinary message.
pub fn parse_directive(input: &str) -> Option<Directive<'_>> {
    let body = input.trim_start().strip_prefix(DIRECTIVE_PREFIX)?;
    let (token, rest) = match body.find(char::is_whitespace) {
        Some(idx) => (&body[..idx], &body[idx..]),
        None => (body, ""),
    };

    let preset = find_preset(token)?;
    let task = rest.trim();
    if task.is_empty() {
        return None;
    }
    Some(Directive { preset, task })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_directive() {
        let directive = parse_directive("@test write a unit test for util").unwrap();
        assert_eq!(directive.preset.token, "test");
        assert_eq!(directive.task, "write a unit test for util");
    }

    #[test]
    fn test_parse_tolerates_surrounding_whitespace() {
        let directive = parse_directive("  @review\tcheck src/lib.rs  ").unwrap();
        assert_eq!(directive.preset.token, "review");
        assert_eq!(directive.task, "check src/lib.rs");
    }

    #[test]
    fn test_unknown_or_empty_directive_falls_through() {
        assert_eq!(parse_directive("@deploy to prod"), None);
        assert_eq!(parse_directive("@test"), None);
        assert_eq!(parse_directive("@test    "), None);
        assert_eq!(parse_directive("email me@test later"), None);
        assert_eq!(parse_directive("plain message"), None);
    }

    #[test]
    fn test_preset_allow_lists() {
        let review = find_preset("review").unwrap().to_config();
        assert!(review.available_tools.permits("read_file"));
        assert!(!review.available_tools.permits("write_file"));
        assert!(!review.available_tools.permits("run_command"));
        assert_eq!(review.effective_max_loops(), 8);

        let debug = find_preset("debug").unwrap();
        assert_eq!(
            debug.tool_names(),
            vec!["read_file", "list_files", "search_codebase", "find_files", "run_command"]
        );

        let refactor = find_preset("refactor").unwrap().to_config();
        assert_eq!(refactor.max_loops, Some(12));
        assert_eq!(refactor.agent_type, "refactor");
    }
}
