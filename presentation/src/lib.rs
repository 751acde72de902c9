//! Presentation layer for shipwright
//!
//! CLI definitions, the console confirmation prompt, progress reporting,
//! output formatting and the interactive REPL.

pub mod agent;
pub mod cli;
pub mod output;

pub use agent::{AgentRepl, ConsoleConfirmation, ConsoleProgress};
pub use cli::commands::Cli;
pub use output::ConsoleFormatter;
