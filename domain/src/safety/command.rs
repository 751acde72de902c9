//! Dangerous shell command inspection.
//!
//! A matching command is escalated to [`RiskLevel::High`](crate::tool::RiskLevel::High)
//! no matter what the whitelist says.

use std::sync::LazyLock;

use regex::Regex;

/// Category of a dangerous command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DangerousPattern {
    RecursiveForceDelete,
    PrivilegeEscalation,
    WorldWritablePermissions,
    DeviceRedirect,
    FilesystemFormat,
    DiskImageWrite,
    ForkBomb,
}

impl DangerousPattern {
    pub fn description(&self) -> &'static str {
        match self {
            DangerousPattern::RecursiveForceDelete => "recursive force-delete",
            DangerousPattern::PrivilegeEscalation => "privilege escalation",
            DangerousPattern::WorldWritablePermissions => "chmod 777",
            DangerousPattern::DeviceRedirect => "redirect into a block device",
            DangerousPattern::FilesystemFormat => "filesystem format",
            DangerousPattern::DiskImageWrite => "raw disk write (dd of=)",
            DangerousPattern::ForkBomb => "fork bomb",
        }
    }
}

impl std::fmt::Display for DangerousPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

static PATTERN_RULES: LazyLock<Vec<(DangerousPattern, Regex)>> = LazyLock::new(|| {
    [
        (
            DangerousPattern::PrivilegeEscalation,
            r"(?:^|[\s;&|(`])(?:sudo|su|doas)(?:\s|$)",
        ),
        (
            DangerousPattern::WorldWritablePermissions,
            r"\bchmod\s+(?:-[A-Za-z]+\s+)*0?777\b",
        ),
        (
            DangerousPattern::DeviceRedirect,
            r">\s*/dev/(?:sd|hd|nvme|xvd|vd|mmcblk|disk)",
        ),
        (DangerousPattern::FilesystemFormat, r"\bmkfs(?:\.[A-Za-z0-9]+)?\b"),
        (DangerousPattern::DiskImageWrite, r"\bdd\b[^;&|]*\bof="),
        (
            DangerousPattern::ForkBomb,
            r":\s*\(\s*\)\s*\{\s*:\s*\|\s*:\s*&\s*\}\s*;\s*:",
        ),
    ]
    .into_iter()
    .filter_map(|(kind, pattern)| Regex::new(pattern).ok().map(|re| (kind, re)))
    .collect()
});

/// Return the first dangerous pattern the command matches, if any.
pub fn inspect_command(command: &str) -> Option<DangerousPattern> {
    if has_recursive_force_delete(command) {
        return Some(DangerousPattern::RecursiveForceDelete);
    }
    PATTERN_RULES
        .iter()
        .find(|(_, re)| re.is_match(command))
        .map(|(kind, _)| *kind)
}

/// Characters that start a new command segment. Subshells, command
/// substitution and backticks each open one.
const SEGMENT_SEPARATORS: [char; 6] = [';', '&', '|', '\n', '(', '`'];

/// Shell punctuation glued to a word: `(rm`, `'rm`, `/)"`.
const WORD_PUNCTUATION: [char; 6] = ['(', ')', '$', '`', '\'', '"'];

/// `rm` with both a recursive and a force flag, in any spelling
/// (`-rf`, `-fr`, `-r -f`, `--recursive --force`, `-Rf`), also when
/// nested in `( )`, `$( )`, backticks or a quoted `sh -c` argument.
fn has_recursive_force_delete(command: &str) -> bool {
    command
        .split(SEGMENT_SEPARATORS)
        .any(|segment| {
            let mut tokens = segment
                .split_whitespace()
                .map(|t| t.trim_matches(WORD_PUNCTUATION))
                .filter(|t| !t.is_empty());
            if !tokens.any(|t| t == "rm" || t.ends_with("/rm")) {
                return false;
            }
            let mut recursive = false;
            let mut force = false;
            for flag in tokens.filter(|t| t.starts_with('-')) {
                if let Some(long) = flag.strip_prefix("--") {
                    recursive |= long == "recursive";
                    force |= long == "force";
                } else {
                    recursive |= flag.contains(['r', 'R']);
                    force |= flag.contains('f');
                }
            }
            recursive && force
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recursive_force_delete_spellings() {
        for cmd in [
            "rm -rf /",
            "rm -fr build",
            "rm -r -f target",
            "rm --recursive --force dist",
            "cd /tmp && rm -Rf cache",
            "/bin/rm -rf ~",
            "(rm -rf /)",
            "echo $(rm -rf /)",
            "`rm -rf /`",
            "sh -c 'rm -rf /'",
            "bash -c \"rm -fr $HOME\"",
        ] {
            assert_eq!(
                inspect_command(cmd),
                Some(DangerousPattern::RecursiveForceDelete),
                "{cmd}"
            );
        }
    }

    #[test]
    fn test_plain_rm_is_not_flagged() {
        assert_eq!(inspect_command("rm build.log"), None);
        assert_eq!(inspect_command("rm -r old_dir"), None);
        assert_eq!(inspect_command("git rm --cached file"), None);
    }

    #[test]
    fn test_other_patterns() {
        assert_eq!(
            inspect_command("sudo apt install foo"),
            Some(DangerousPattern::PrivilegeEscalation)
        );
        assert_eq!(
            inspect_command("echo hi; su root"),
            Some(DangerousPattern::PrivilegeEscalation)
        );
        assert_eq!(
            inspect_command("chmod -R 777 ."),
            Some(DangerousPattern::WorldWritablePermissions)
        );
        assert_eq!(
            inspect_command("cat image > /dev/sda"),
            Some(DangerousPattern::DeviceRedirect)
        );
        assert_eq!(
            inspect_command("mkfs.ext4 /dev/sdb1"),
            Some(DangerousPattern::FilesystemFormat)
        );
        assert_eq!(
            inspect_command("dd if=/dev/zero of=/dev/sda bs=1M"),
            Some(DangerousPattern::DiskImageWrite)
        );
        assert_eq!(inspect_command(":(){ :|:& };:"), Some(DangerousPattern::ForkBomb));
    }

    #[test]
    fn test_harmless_commands() {
        for cmd in ["cargo test", "ls -la", "chmod 644 README.md", "echo > /dev/null", "git status"] {
            assert_eq!(inspect_command(cmd), None, "{cmd}");
        }
    }
}
