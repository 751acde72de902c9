use shipwright_domain::DomainError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("Config file not found: {0}")]
    MissingFile(String),

    #[error("Invalid policy document {path}: {message}")]
    Policy { path: String, message: String },

    #[error(transparent)]
    Domain(#[from] DomainError),
}
