use thiserror::Error;

use crate::config::ConfigError;

/// LLM-specific errors
#[derive(Error, Debug)]
pub enum LlmError {
    /// Credential could not be resolved when a handle was requested
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("API request failed with status {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to build HTTP client: {0}")]
    ClientBuildFailed(String),

    #[error("Invalid API key format: {0}")]
    InvalidApiKey(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl LlmError {
    /// True when the error is the missing-credential configuration error
    pub fn is_missing_api_key(&self) -> bool {
        matches!(self, LlmError::Config(ConfigError::MissingEnvVar { .. }))
    }
}

pub type Result<T> = std::result::Result<T, LlmError>;
