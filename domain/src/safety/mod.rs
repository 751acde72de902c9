//! Safety domain module
//!
//! Classification and authorization rules applied before every
//! capability invocation. Obtaining the user's answer to a confirmation is
//! the caller's job; this module only decides whether one is needed.
//!
//! - [`SafetyGate`]: the decision table (risk, auto-confirm, whitelist)
//! - [`SafetyPolicy`]: project policy document (command whitelist, path rules)
//! - [`inspect_command`]: dangerous shell pattern detection
//! - [`resolve_path`]: lexical resolution against the working directory
//! - [`resolve_existing`]: symlink resolution for the path rules

pub mod command;
pub mod gate;
pub mod paths;
pub mod policy;

pub use command::{DangerousPattern, inspect_command};
pub use gate::{GateDecision, SafetyAssessment, SafetyGate};
pub use paths::{normalize, resolve_existing, resolve_path};
pub use policy::{PathViolation, SafetyPolicy};
