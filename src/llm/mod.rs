pub mod client;
pub mod error;
pub mod handle;
pub mod types;


pub use client::OpenAIClient;
pub use error::{LlmError, Result};
pub use handle::{AsyncClient, ClientFactory, HttpClientFactory, SyncClient};
pub use types::{Choice, CompletionRequest, CompletionResponse, Message, Role, Usage};
