use std::fmt;

use once_cell::sync::OnceCell;
use tracing::debug;

use super::error::Result;
use super::handle::{ClientFactory, HttpClientFactory};
use crate::config::{resolve_api_key, EnvSource, ProcessEnv, DEFAULT_BASE_URL};

/// OpenAI client whose underlying HTTP clients are built on first use.
///
/// Construction never reads the environment, so a process configured for a
/// different backend can hold one of these without an API key. The key is
/// resolved when [`get_sync_client`](Self::get_sync_client) or
/// [`get_async_client`](Self::get_async_client) is first called: the explicit
/// key if one was given, otherwise `OPENAI_API_KEY`.
///
/// Each handle is built at most once per instance. A failed resolution is not
/// remembered; the next call looks at the environment again.
pub struct OpenAIClient<F: ClientFactory = HttpClientFactory, E = ProcessEnv> {
    api_key: Option<String>,
    factory: F,
    env: E,
    sync_client: OnceCell<F::Sync>,
    async_client: OnceCell<F::Async>,
}

impl OpenAIClient {
    /// Create a client backed by reqwest and the process environment
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_factory(api_key, HttpClientFactory::default())
    }
}

impl Default for OpenAIClient {
    fn default() -> Self {
        Self::new(None)
    }
}

impl<F: ClientFactory> OpenAIClient<F, ProcessEnv> {
    /// Create a client that builds its handles with `factory`
    pub fn with_factory(api_key: Option<String>, factory: F) -> Self {
        Self {
            api_key,
            factory,
            env: ProcessEnv,
            sync_client: OnceCell::new(),
            async_client: OnceCell::new(),
        }
    }
}

impl<F: ClientFactory, E: EnvSource> OpenAIClient<F, E> {
    /// Replace the environment the API key is looked up in
    pub fn with_env<E2: EnvSource>(self, env: E2) -> OpenAIClient<F, E2> {
        OpenAIClient {
            api_key: self.api_key,
            factory: self.factory,
            env,
            sync_client: self.sync_client,
            async_client: self.async_client,
        }
    }

    /// The explicit API key given at construction, if any
    pub fn explicit_api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// The sync handle if it has already been built
    pub fn sync_client(&self) -> Option<&F::Sync> {
        self.sync_client.get()
    }

    /// The async handle if it has already been built
    pub fn async_client(&self) -> Option<&F::Async> {
        self.async_client.get()
    }

    /// Get the blocking client, building it on first call
    pub fn get_sync_client(&self) -> Result<&F::Sync> {
        self.sync_client.get_or_try_init(|| -> Result<F::Sync> {
            let api_key = resolve_api_key(self.api_key.as_deref(), &self.env)?;
            debug!(base_url = DEFAULT_BASE_URL, "Building sync OpenAI client");
            self.factory.build_sync(&api_key, DEFAULT_BASE_URL)
        })
    }

    /// Get the async client, building it on first call
    pub fn get_async_client(&self) -> Result<&F::Async> {
        self.async_client.get_or_try_init(|| -> Result<F::Async> {
            let api_key = resolve_api_key(self.api_key.as_deref(), &self.env)?;
            debug!(base_url = DEFAULT_BASE_URL, "Building async OpenAI client");
            self.factory.build_async(&api_key, DEFAULT_BASE_URL)
        })
    }
}

impl<F: ClientFactory, E> fmt::Debug for OpenAIClient<F, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAIClient")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("sync_client", &self.sync_client.get().is_some())
            .field("async_client", &self.async_client.get().is_some())
            .finish()
    }
}
