use std::time::Duration;

use reqwest::header;
use tracing::debug;

use super::error::{LlmError, Result};
use super::types::{CompletionRequest, CompletionResponse};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Builds the underlying API clients from a resolved key and base URL
pub trait ClientFactory {
    type Sync;
    type Async;

    fn build_sync(&self, api_key: &str, base_url: &str) -> Result<Self::Sync>;

    fn build_async(&self, api_key: &str, base_url: &str) -> Result<Self::Async>;
}

/// Factory producing reqwest-backed clients
#[derive(Debug, Clone)]
pub struct HttpClientFactory {
    timeout: Duration,
}

impl HttpClientFactory {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for HttpClientFactory {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl ClientFactory for HttpClientFactory {
    type Sync = SyncClient;
    type Async = AsyncClient;

    fn build_sync(&self, api_key: &str, base_url: &str) -> Result<SyncClient> {
        let http = reqwest::blocking::Client::builder()
            .default_headers(default_headers(api_key)?)
            .timeout(self.timeout)
            .build()
            .map_err(|e| LlmError::ClientBuildFailed(e.to_string()))?;

        Ok(SyncClient {
            http,
            api_key: api_key.to_string(),
            base_url: base_url.to_string(),
        })
    }

    fn build_async(&self, api_key: &str, base_url: &str) -> Result<AsyncClient> {
        let http = reqwest::Client::builder()
            .default_headers(default_headers(api_key)?)
            .timeout(self.timeout)
            .build()
            .map_err(|e| LlmError::ClientBuildFailed(e.to_string()))?;

        Ok(AsyncClient {
            http,
            api_key: api_key.to_string(),
            base_url: base_url.to_string(),
        })
    }
}

fn default_headers(api_key: &str) -> Result<header::HeaderMap> {
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/json"),
    );

    let mut auth = header::HeaderValue::from_str(&format!("Bearer {}", api_key))
        .map_err(|e| LlmError::InvalidApiKey(e.to_string()))?;
    auth.set_sensitive(true);
    headers.insert(header::AUTHORIZATION, auth);

    Ok(headers)
}

fn completions_url(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

/// Blocking client handle
///
/// Must not be built or dropped from inside an async runtime.
#[derive(Debug, Clone)]
pub struct SyncClient {
    http: reqwest::blocking::Client,
    api_key: String,
    base_url: String,
}

impl SyncClient {
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a completion request and wait for the response
    pub fn chat_completion(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        let url = completions_url(&self.base_url);
        debug!(model = %request.model, %url, "Sending blocking completion request");

        let response = self.http.post(&url).json(request).send()?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<CompletionResponse>()
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))
    }
}

/// Async client handle
#[derive(Debug, Clone)]
pub struct AsyncClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl AsyncClient {
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a completion request
    pub async fn chat_completion(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        let url = completions_url(&self.base_url);
        debug!(model = %request.model, %url, "Sending completion request");

        let response = self.http.post(&url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<CompletionResponse>()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_BASE_URL;
    use crate::llm::types::Message;

    fn request() -> CompletionRequest {
        CompletionRequest::new("gpt-4o-mini", vec![Message::user("Say hi")])
    }

    #[test]
    fn test_build_sync_keeps_parameters() {
        let client = HttpClientFactory::default()
            .build_sync("test-key", DEFAULT_BASE_URL)
            .unwrap();
        assert_eq!(client.api_key(), "test-key");
        assert_eq!(client.base_url(), "https://api.openai.com/v1");
    }

    #[test]
    fn test_build_async_keeps_parameters() {
        let client = HttpClientFactory::default()
            .build_async("test-key", DEFAULT_BASE_URL)
            .unwrap();
        assert_eq!(client.api_key(), "test-key");
        assert_eq!(client.base_url(), "https://api.openai.com/v1");
    }

    #[test]
    fn test_invalid_api_key() {
        let result = HttpClientFactory::default().build_async("\0invalid\0key", DEFAULT_BASE_URL);
        match result {
            Err(err) => assert!(err.to_string().contains("Invalid API key format")),
            Ok(_) => panic!("expected invalid key to be rejected"),
        }
    }

    #[test]
    fn test_completions_url() {
        assert_eq!(
            completions_url("https://api.openai.com/v1"),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            completions_url("http://localhost:8080/"),
            "http://localhost:8080/chat/completions"
        );
    }

    #[tokio::test]
    async fn test_async_chat_completion() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"choices":[{"message":{"role":"assistant","content":"hi"},"finish_reason":"stop"}]}"#,
            )
            .create_async()
            .await;

        let client = HttpClientFactory::default()
            .build_async("test-key", &server.url())
            .unwrap();
        let response = client.chat_completion(&request()).await.unwrap();

        assert_eq!(response.first_content(), Some("hi"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_async_chat_completion_api_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .with_body("Incorrect API key provided")
            .create_async()
            .await;

        let client = HttpClientFactory::default()
            .build_async("bad-key", &server.url())
            .unwrap();
        let err = client.chat_completion(&request()).await.unwrap_err();

        match err {
            LlmError::ApiError { status, message } => {
                assert_eq!(status, 401);
                assert!(message.contains("Incorrect API key"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_sync_chat_completion() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"hello"}}]}"#)
            .create();

        let client = HttpClientFactory::default()
            .build_sync("test-key", &server.url())
            .unwrap();
        let response = client.chat_completion(&request()).unwrap();

        assert_eq!(response.first_content(), Some("hello"));
        mock.assert();
    }

    #[test]
    fn test_sync_chat_completion_bad_body() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body("not json")
            .create();

        let client = HttpClientFactory::default()
            .build_sync("test-key", &server.url())
            .unwrap();
        let err = client.chat_completion(&request()).unwrap_err();
        assert!(matches!(err, LlmError::InvalidResponse(_)));
    }
}
