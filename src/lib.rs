//! Lazily initialized OpenAI client.
//!
//! [`OpenAIClient`] can be created without an API key. The key is resolved,
//! and the underlying HTTP client built, only when a handle is first requested.

pub mod config;
pub mod llm;

pub use config::{Config, ConfigError, DEFAULT_BASE_URL, OPENAI_API_KEY_ENV};
pub use llm::{AsyncClient, LlmError, OpenAIClient, SyncClient};
