//! Agent domain
//!
//! Policy ([`AgentConfig`]) and per-run state ([`AgentState`]) of the
//! bounded tool-use loop, plus the static sub-agent presets.

pub mod entities;
pub mod presets;

pub use entities::{AgentConfig, AgentState, DEFAULT_MAX_LOOPS, LoopPhase, ToolAccess};
pub use presets::{Directive, PRESETS, SubAgentPreset, find_preset, parse_directive};
