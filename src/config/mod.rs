pub mod env;
pub mod error;

pub use env::{resolve_api_key, EnvSource, ProcessEnv, DEFAULT_BASE_URL, OPENAI_API_KEY_ENV};
pub use error::{ConfigError, Result};

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Name of the configuration file searched for by [`Config::load`]
pub const CONFIG_FILE_NAME: &str = "lazy-openai.toml";

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

/// Configuration for the command-line front end
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// Model used for chat completions
    #[serde(default = "default_model")]
    pub model: String,

    /// API key (optional). Supports `${VAR}` expansion.
    pub api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key: None,
        }
    }
}

impl Config {
    /// Load configuration from lazy-openai.toml, searching upward from `target_path`
    pub fn load(target_path: impl AsRef<Path>) -> Result<Self> {
        let config_path = find_config_file(target_path.as_ref())?;
        Self::from_file(&config_path)
    }

    /// Like [`Config::load`], but falls back to defaults when no file exists
    pub fn load_or_default(target_path: impl AsRef<Path>) -> Result<Self> {
        match find_config_file(target_path.as_ref()) {
            Ok(path) => Self::from_file(&path),
            Err(ConfigError::NotFound(dir)) => {
                debug!("No {} found from {}, using defaults", CONFIG_FILE_NAME, dir);
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Parse a specific configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path).map_err(|e| {
            ConfigError::ReadFailed(format!("{}: {}", path.display(), e))
        })?;

        let mut config: Config = toml::from_str(&data)?;

        if let Some(api_key) = &config.api_key {
            if !api_key.contains("${") && api_key.starts_with("sk-") {
                warn!(
                    "API key appears to be hardcoded in {}. Consider using environment variables: api_key = \"${{{}}}\"",
                    CONFIG_FILE_NAME, OPENAI_API_KEY_ENV
                );
            }
        }

        config.expand_env_vars(&ProcessEnv);
        config.validate()?;

        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::Invalid(format!(
                "'model' must not be empty in {}",
                CONFIG_FILE_NAME
            )));
        }
        Ok(())
    }

    /// Expand `${VAR}` references. An unset variable leaves the key unset,
    /// so resolution falls through to the default environment variable.
    fn expand_env_vars(&mut self, env: &impl EnvSource) {
        if let Some(api_key) = self.api_key.take() {
            self.api_key = match env_reference(&api_key) {
                Some(var_name) => env.var(var_name),
                None => Some(api_key),
            };
        }
    }
}

/// Find lazy-openai.toml by searching upward from the given path
fn find_config_file(start_path: &Path) -> Result<PathBuf> {
    let current_dir = if start_path.is_file() {
        start_path
            .parent()
            .ok_or_else(|| ConfigError::Invalid("Invalid file path".to_string()))?
    } else {
        start_path
    };

    let mut current_dir = current_dir.canonicalize().map_err(|e| {
        ConfigError::ReadFailed(format!(
            "Failed to resolve path {}: {}",
            current_dir.display(),
            e
        ))
    })?;

    loop {
        let config_path = current_dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Ok(config_path);
        }

        match current_dir.parent() {
            Some(parent) => current_dir = parent.to_path_buf(),
            None => break,
        }
    }

    Err(ConfigError::NotFound(start_path.display().to_string()))
}

/// Returns the variable name for values of the form `${VAR_NAME}`
fn env_reference(value: &str) -> Option<&str> {
    value
        .strip_prefix("${")
        .and_then(|rest| rest.strip_suffix('}'))
}
