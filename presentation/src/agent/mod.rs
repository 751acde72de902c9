//! Interactive agent front end: confirmation prompt, progress, and the REPL.

pub mod confirmation;
pub mod progress;
pub mod repl;

pub use confirmation::ConsoleConfirmation;
pub use progress::ConsoleProgress;
pub use repl::AgentRepl;
