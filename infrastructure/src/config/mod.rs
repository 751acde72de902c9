//! Configuration loading: the TOML config layers and the project policy.

mod error;
mod file_config;
mod loader;
mod policy;

pub use error::ConfigError;
pub use file_config::{FileAgentConfig, FileConfig, FileLlmConfig, FileToolsConfig};
pub use loader::ConfigLoader;
pub use policy::{POLICY_FILE, load_policy, policy_path};
