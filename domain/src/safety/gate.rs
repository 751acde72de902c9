//! Safety gate decision table.
//!
//! Evaluated for every capability invocation, in this order:
//!
//! 1. Path rules for write/delete tools. A violation blocks outright.
//! 2. Static risk, escalated to `High` when a command matches a dangerous pattern.
//! 3. `High` always confirms, auto-confirm notwithstanding.
//! 4. `Medium` confirms unless auto-confirm is on or the command is whitelisted.
//! 5. `Low` proceeds.

use std::path::Path;

use super::command::inspect_command;
use super::paths::resolve_path;
use super::policy::SafetyPolicy;
use crate::tool::entities::{RiskLevel, ToolCall, ToolDefinition, ToolKind};

/// Outcome of the gate for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Proceed,
    Confirm { reason: String },
    Block { reason: String },
}

/// Decision plus the risk level it was derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafetyAssessment {
    pub risk: RiskLevel,
    pub decision: GateDecision,
}

impl SafetyAssessment {
    fn new(risk: RiskLevel, decision: GateDecision) -> Self {
        Self { risk, decision }
    }
}

/// Classifies invocations. Holds only the global auto-confirm switch;
/// the policy and working directory come from the execution context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SafetyGate {
    auto_confirm: bool,
}

impl SafetyGate {
    pub fn new(auto_confirm: bool) -> Self {
        Self { auto_confirm }
    }

    pub fn auto_confirm(&self) -> bool {
        self.auto_confirm
    }

    pub fn assess(
        &self,
        definition: &ToolDefinition,
        call: &ToolCall,
        policy: &SafetyPolicy,
        working_dir: &Path,
    ) -> SafetyAssessment {
        let static_risk = definition.effective_risk();

        if matches!(definition.kind, ToolKind::Write | ToolKind::Delete)
            && let Some(raw) = call.get_string("path")
        {
            let target = resolve_path(working_dir, raw);
            let verdict = if definition.kind == ToolKind::Delete {
                policy.check_delete(&target, working_dir)
            } else {
                policy.check_write(&target, working_dir)
            };
            if let Err(violation) = verdict {
                return SafetyAssessment::new(
                    static_risk,
                    GateDecision::Block {
                        reason: violation.to_string(),
                    },
                );
            }
        }

        let command = (definition.kind == ToolKind::Command)
            .then(|| call.get_string("command"))
            .flatten();

        if let Some(pattern) = command.and_then(inspect_command) {
            return SafetyAssessment::new(
                RiskLevel::High,
                GateDecision::Confirm {
                    reason: format!("command matches dangerous pattern: {}", pattern),
                },
            );
        }

        let decision = match static_risk {
            RiskLevel::High => GateDecision::Confirm {
                reason: format!("{} is a high-risk capability", definition.name),
            },
            RiskLevel::Medium if self.auto_confirm => GateDecision::Proceed,
            RiskLevel::Medium if command.is_some_and(|c| policy.is_command_whitelisted(c)) => {
                GateDecision::Proceed
            }
            RiskLevel::Medium => GateDecision::Confirm {
                reason: format!("{} modifies the workspace", definition.name),
            },
            RiskLevel::Low => GateDecision::Proceed,
        };

        SafetyAssessment::new(static_risk, decision)
    }
}
