//! Project safety policy document (`.shipwright/policy.json`).

use super::error::ConfigError;
use shipwright_domain::SafetyPolicy;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const POLICY_FILE: &str = "policy.json";

/// `<working_dir>/.shipwright/policy.json`
pub fn policy_path(working_dir: &Path) -> PathBuf {
    working_dir.join(".shipwright").join(POLICY_FILE)
}

/// Load the project policy. A missing document is the empty policy.
pub fn load_policy(working_dir: &Path) -> Result<SafetyPolicy, ConfigError> {
    let path = policy_path(working_dir);
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "No policy document, using empty policy");
            return Ok(SafetyPolicy::default());
        }
        Err(e) => {
            return Err(ConfigError::Policy {
                path: path.display().to_string(),
                message: e.to_string(),
            });
        }
    };

    let policy: SafetyPolicy = serde_json::from_str(&content).map_err(|e| ConfigError::Policy {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    debug!(
        path = %path.display(),
        allow_commands = policy.allow_commands.len(),
        allow_write_paths = policy.allow_write_paths.len(),
        deny_paths = policy.deny_paths.len(),
        "Loaded policy document"
    );
    Ok(policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_policy_is_empty() {
        let dir = TempDir::new().unwrap();
        assert_eq!(load_policy(dir.path()).unwrap(), SafetyPolicy::default());
    }

    #[test]
    fn test_load_policy() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join(".shipwright")).unwrap();
        fs::write(
            policy_path(dir.path()),
            r#"{"allow_commands": ["cargo test", "npm run *"], "deny_paths": [".env"]}"#,
        )
        .unwrap();

        let policy = load_policy(dir.path()).unwrap();
        assert!(policy.is_command_whitelisted("npm run build"));
        assert!(policy.allow_write_paths.is_empty());
        assert_eq!(policy.deny_paths, vec![".env"]);
    }

    #[test]
    fn test_malformed_policy_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join(".shipwright")).unwrap();
        fs::write(policy_path(dir.path()), "allow_commands = []").unwrap();

        assert!(matches!(
            load_policy(dir.path()),
            Err(ConfigError::Policy { .. })
        ));
    }
}
