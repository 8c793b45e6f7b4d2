use thiserror::Error;

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable {var} must be set")]
    MissingEnvVar { var: String },

    #[error("Configuration file not found in {0} or any parent directory")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to read configuration file: {0}")]
    ReadFailed(String),

    #[error("Failed to parse TOML: {0}")]
    ParseFailed(#[from] toml::de::Error),
}

impl ConfigError {
    pub fn missing_env_var(var: impl Into<String>) -> Self {
        ConfigError::MissingEnvVar { var: var.into() }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
