use std::collections::HashMap;

use tracing::debug;

use super::error::{ConfigError, Result};

/// Environment variable consulted when no explicit key is supplied
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Base endpoint every constructed client talks to
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Read access to environment variables
pub trait EnvSource {
    fn var(&self, key: &str) -> Option<String>;
}

/// The process environment, read at call time
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Fixed set of variables, for embedding and tests
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }
}

impl EnvSource for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

/// Resolve the effective API key.
///
/// The explicit key wins; otherwise `OPENAI_API_KEY` is looked up in `env`.
/// Nothing is cached here, so every call sees the environment as it is now.
pub fn resolve_api_key(explicit: Option<&str>, env: &impl EnvSource) -> Result<String> {
    if let Some(key) = explicit {
        debug!("Using explicitly supplied API key");
        return Ok(key.to_string());
    }

    match env.var(OPENAI_API_KEY_ENV) {
        Some(key) => {
            debug!("Using API key from {}", OPENAI_API_KEY_ENV);
            Ok(key)
        }
        None => Err(ConfigError::missing_env_var(OPENAI_API_KEY_ENV)),
    }
}
