//! Use cases: the agent loop and everything that feeds it.

pub mod assistant;
pub mod dispatch_guard;
pub mod run_agent;
pub mod sub_agent;
mod tool_helpers;

#[cfg(test)]
pub(crate) mod test_support;
