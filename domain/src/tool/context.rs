//! Execution context handed to every capability invocation.
//!
//! Carries the working directory, the project safety policy, and the
//! confirmation callback. The callback is an injected trait object so the
//! console prompt can be swapped for a deterministic fake in tests.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use super::entities::RiskLevel;
use crate::safety::{SafetyPolicy, resolve_path};

/// What the user is asked to approve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationRequest {
    pub tool_name: String,
    pub risk_level: RiskLevel,
    /// Why confirmation is needed (e.g. "matches dangerous pattern: recursive force-delete")
    pub reason: String,
    /// Compact rendering of the call arguments
    pub summary: String,
}

/// Confirmation callback.
///
/// Returns `true` to proceed, `false` to cancel the invocation.
#[async_trait]
pub trait ConfirmAction: Send + Sync {
    async fn confirm(&self, request: &ConfirmationRequest) -> bool;
}

/// Approves everything. Used for non-interactive runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

#[async_trait]
impl ConfirmAction for AlwaysConfirm {
    async fn confirm(&self, _request: &ConfirmationRequest) -> bool {
        true
    }
}

/// Declines everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverConfirm;

#[async_trait]
impl ConfirmAction for NeverConfirm {
    async fn confirm(&self, _request: &ConfirmationRequest) -> bool {
        false
    }
}

/// `{workingDirectory, confirmAction, policy}` passed to `execute`.
#[derive(Clone)]
pub struct ExecutionContext {
    working_dir: PathBuf,
    confirm: Arc<dyn ConfirmAction>,
    policy: Arc<SafetyPolicy>,
}

impl ExecutionContext {
    pub fn new(
        working_dir: impl Into<PathBuf>,
        confirm: Arc<dyn ConfirmAction>,
        policy: Arc<SafetyPolicy>,
    ) -> Self {
        Self {
            working_dir: working_dir.into(),
            confirm,
            policy,
        }
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn policy(&self) -> &SafetyPolicy {
        &self.policy
    }

    pub fn confirmer(&self) -> &dyn ConfirmAction {
        self.confirm.as_ref()
    }

    /// Resolve a tool argument path against the working directory.
    pub fn resolve(&self, raw: &str) -> PathBuf {
        resolve_path(&self.working_dir, raw)
    }
}

impl std::fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("working_dir", &self.working_dir)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ConfirmationRequest {
        ConfirmationRequest {
            tool_name: "write_file".to_string(),
            risk_level: RiskLevel::Medium,
            reason: "medium-risk capability".to_string(),
            summary: "path=a.txt".to_string(),
        }
    }

    #[tokio::test]
    async fn test_fixed_confirmers() {
        assert!(AlwaysConfirm.confirm(&request()).await);
        assert!(!NeverConfirm.confirm(&request()).await);
    }

    #[test]
    fn test_resolve_relative_to_working_dir() {
        let ctx = ExecutionContext::new(
            "/work/project",
            Arc::new(NeverConfirm),
            Arc::new(SafetyPolicy::default()),
        );
        assert_eq!(ctx.resolve("src/lib.rs"), PathBuf::from("/work/project/src/lib.rs"));
        assert_eq!(ctx.resolve("/etc/hosts"), PathBuf::from("/etc/hosts"));
    }
}
