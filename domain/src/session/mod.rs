//! Conversation domain.
//!
//! - [`entities::Message`]: canonical, backend-agnostic message
//! - [`entities::ToolResultRecord`]: one call's outcome inside a folded tool message
//! - [`response::LlmResponse`]: canonical parsed model response

pub mod entities;
pub mod response;

pub use entities::{Message, Role, ToolResultRecord};
pub use response::{ContentBlock, LlmResponse, StopReason};
