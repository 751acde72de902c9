//! Project safety policy: command whitelist and write/delete path rules.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::paths::{resolve_existing, resolve_path};

/// Marker that turns a whitelist entry into a prefix match.
pub const WILDCARD: char = '*';

/// Project policy document.
///
/// ```json
/// {
///   "allow_commands": ["cargo test", "git status", "npm run *"],
///   "allow_write_paths": ["src/", "tests/"],
///   "deny_paths": [".env", ".git/"]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetyPolicy {
    /// Commands that run without confirmation (exact, or prefix when ending in `*`)
    pub allow_commands: Vec<String>,
    /// When non-empty, writes and deletes must land under one of these prefixes
    pub allow_write_paths: Vec<String>,
    /// Substrings that block any write or delete whose absolute path contains them
    pub deny_paths: Vec<String>,
}

/// Why a write or delete was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathViolation {
    #[error("path {path} matches deny entry '{entry}'")]
    Denied { path: String, entry: String },

    #[error("path {path} is outside the allowed write paths")]
    NotAllowed { path: String },

    #[error("refusing to delete {path}: it contains the working directory")]
    ContainsWorkingDirectory { path: String },
}

impl SafetyPolicy {
    /// Exact match, or prefix match for entries ending in `*`.
    pub fn is_command_whitelisted(&self, command: &str) -> bool {
        let command = command.trim();
        self.allow_commands.iter().any(|entry| {
            let entry = entry.trim();
            match entry.strip_suffix(WILDCARD) {
                Some(prefix) => command.starts_with(prefix),
                None => command == entry,
            }
        })
    }

    /// Authorize a write to the already-resolved absolute `path`.
    ///
    /// The rules are applied to the lexical path and again after symlinks
    /// in its existing ancestors are followed; both must pass. The deny
    /// list is checked first and always wins.
    pub fn check_write(&self, path: &Path, working_dir: &Path) -> Result<(), PathViolation> {
        let lexical_prefixes: Vec<PathBuf> = self
            .allow_write_paths
            .iter()
            .map(|prefix| resolve_path(working_dir, prefix))
            .collect();
        self.check_rules(path, &lexical_prefixes)?;

        let physical = resolve_existing(path);
        let physical_prefixes: Vec<PathBuf> =
            lexical_prefixes.iter().map(|p| resolve_existing(p)).collect();
        self.check_rules(&physical, &physical_prefixes)
    }

    fn check_rules(&self, path: &Path, allowed: &[PathBuf]) -> Result<(), PathViolation> {
        let display = path.to_string_lossy();

        if let Some(entry) = self
            .deny_paths
            .iter()
            .map(|e| e.trim())
            .find(|e| !e.is_empty() && display.contains(e))
        {
            return Err(PathViolation::Denied {
                path: display.into_owned(),
                entry: entry.to_string(),
            });
        }

        if !allowed.is_empty() && !allowed.iter().any(|prefix| path.starts_with(prefix)) {
            return Err(PathViolation::NotAllowed {
                path: display.into_owned(),
            });
        }

        Ok(())
    }

    /// Authorize a delete: write rules plus protection of the working directory
    /// and all of its ancestors.
    pub fn check_delete(&self, path: &Path, working_dir: &Path) -> Result<(), PathViolation> {
        self.check_write(path, working_dir)?;

        if working_dir.starts_with(path)
            || resolve_existing(working_dir).starts_with(resolve_existing(path))
        {
            return Err(PathViolation::ContainsWorkingDirectory {
                path: path.to_string_lossy().into_owned(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn policy() -> SafetyPolicy {
        SafetyPolicy {
            allow_commands: vec![
                "cargo test".to_string(),
                "git *".to_string(),
            ],
            allow_write_paths: vec!["src/".to_string(), "/tmp/scratch".to_string()],
            deny_paths: vec![".env".to_string(), "secrets".to_string()],
        }
    }

    #[test]
    fn test_command_whitelist_exact_and_prefix() {
        let policy = policy();
        assert!(policy.is_command_whitelisted("cargo test"));
        assert!(policy.is_command_whitelisted("  cargo test "));
        assert!(!policy.is_command_whitelisted("cargo test --release"));
        assert!(policy.is_command_whitelisted("git status"));
        assert!(policy.is_command_whitelisted("git log --oneline"));
        assert!(!policy.is_command_whitelisted("gitk"));
    }

    #[test]
    fn test_bare_wildcard_matches_everything() {
        let policy = SafetyPolicy {
            allow_commands: vec!["*".to_string()],
            ..Default::default()
        };
        assert!(policy.is_command_whitelisted("anything at all"));
    }

    #[test]
    fn test_deny_wins_over_allow_prefix() {
        let wd = Path::new("/work/app");
        let path = PathBuf::from("/work/app/src/secrets/key.rs");

        let err = policy().check_write(&path, wd).unwrap_err();
        assert!(matches!(err, PathViolation::Denied { ref entry, .. } if entry == "secrets"));
    }

    #[test]
    fn test_allow_list_requires_prefix() {
        let wd = Path::new("/work/app");
        let policy = policy();

        assert!(policy.check_write(Path::new("/work/app/src/lib.rs"), wd).is_ok());
        assert!(policy.check_write(Path::new("/tmp/scratch/out.txt"), wd).is_ok());
        assert!(matches!(
            policy.check_write(Path::new("/work/app/Cargo.toml"), wd),
            Err(PathViolation::NotAllowed { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_inside_allowed_prefix_cannot_escape() {
        let workspace = tempfile::TempDir::new().unwrap();
        let outside = tempfile::TempDir::new().unwrap();
        let wd = workspace.path();
        std::fs::create_dir(wd.join("src")).unwrap();
        std::os::unix::fs::symlink(outside.path(), wd.join("src/escape")).unwrap();

        let policy = SafetyPolicy {
            allow_write_paths: vec!["src/".to_string()],
            ..Default::default()
        };

        assert!(policy.check_write(&resolve_path(wd, "src/lib.rs"), wd).is_ok());
        assert!(matches!(
            policy.check_write(&resolve_path(wd, "src/escape/payload.sh"), wd),
            Err(PathViolation::NotAllowed { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_deny_entry_applies_to_symlink_target() {
        let workspace = tempfile::TempDir::new().unwrap();
        let wd = workspace.path();
        std::fs::create_dir_all(wd.join("secrets")).unwrap();
        std::os::unix::fs::symlink(wd.join("secrets"), wd.join("notes")).unwrap();

        let policy = SafetyPolicy {
            deny_paths: vec!["secrets".to_string()],
            ..Default::default()
        };

        let err = policy.check_write(&resolve_path(wd, "notes/key.txt"), wd).unwrap_err();
        assert!(matches!(err, PathViolation::Denied { ref entry, .. } if entry == "secrets"));
    }

    #[cfg(unix)]
    #[test]
    fn test_delete_refuses_symlink_to_working_dir_ancestor() {
        let workspace = tempfile::TempDir::new().unwrap();
        let wd = workspace.path().join("app");
        std::fs::create_dir(&wd).unwrap();
        std::os::unix::fs::symlink(workspace.path(), wd.join("up")).unwrap();

        assert!(matches!(
            SafetyPolicy::default().check_delete(&resolve_path(&wd, "up"), &wd),
            Err(PathViolation::ContainsWorkingDirectory { .. })
        ));
    }

    #[test]
    fn test_empty_policy_allows_writes() {
        let wd = Path::new("/work/app");
        assert!(SafetyPolicy::default()
            .check_write(Path::new("/anywhere/file"), wd)
            .is_ok());
    }

    #[test]
    fn test_delete_refuses_working_dir_and_ancestors() {
        let wd = Path::new("/work/app");
        let policy = SafetyPolicy::default();

        for target in ["/work/app", "/work", "/"] {
            assert!(matches!(
                policy.check_delete(Path::new(target), wd),
                Err(PathViolation::ContainsWorkingDirectory { .. })
            ));
        }
        assert!(policy.check_delete(Path::new("/work/app/build"), wd).is_ok());
        assert!(policy.check_delete(Path::new("/work/application"), wd).is_ok());
    }

    #[test]
    fn test_deserialize_partial_document() {
        let policy: SafetyPolicy =
            serde_json::from_str(r#"{"deny_paths": [".git/"]}"#).unwrap();
        assert!(policy.allow_commands.is_empty());
        assert_eq!(policy.deny_paths, vec![".git/"]);
    }
}
