//! HTTP client abstraction for testability

use std::future::Future;
use std::time::Duration;

use tracing::trace;

use super::types::ProviderError;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default User-Agent string for HTTP requests.
///
/// Public tile servers (OpenStreetMap in particular) reject requests that
/// carry no identifying User-Agent.
pub const DEFAULT_USER_AGENT: &str = concat!("tilekit/", env!("CARGO_PKG_VERSION"));

/// Trait for asynchronous HTTP client operations.
///
/// This abstraction allows for dependency injection and easier testing
/// by enabling mock HTTP clients in tests.
pub trait AsyncHttpClient: Send + Sync {
    /// Performs an async HTTP GET request.
    ///
    /// # Returns
    ///
    /// The response body on a 2xx status. Any other status is reported as
    /// [`ProviderError::Status`] so callers can classify it.
    fn get(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, ProviderError>> + Send;
}

/// Async HTTP client implementation using reqwest.
#[derive(Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Creates a new ReqwestClient with default configuration.
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_settings(DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT)
    }

    /// Creates a new ReqwestClient with custom timeout and User-Agent.
    pub fn with_settings(timeout_secs: u64, user_agent: &str) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .build()
            .map_err(|e| ProviderError::ClientBuild(e.to_string()))?;

        Ok(Self { client })
    }
}

impl AsyncHttpClient for ReqwestClient {
    async fn get(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
        let response =
            self.client
                .get(url)
                .send()
                .await
                .map_err(|e| ProviderError::Transport {
                    url: url.to_string(),
                    reason: e.to_string(),
                })?;

        let status = response.status();
        trace!(url = url, status = status.as_u16(), "Tile response");

        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| ProviderError::Transport {
                url: url.to_string(),
                reason: format!("failed to read response body: {}", e),
            })
    }
}
