//! Download configuration.

use crate::provider::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};

/// Default number of tiles in flight at once.
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Configuration for tile downloading.
///
/// # Example
///
/// ```
/// use tilekit::config::DownloadConfig;
///
/// let config = DownloadConfig::default();
/// assert_eq!(config.concurrency(), 10);
/// assert_eq!(config.timeout_secs(), 30);
///
/// let config = DownloadConfig::new()
///     .with_concurrency(4)
///     .with_timeout_secs(60);
/// assert_eq!(config.concurrency(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadConfig {
    /// Maximum number of concurrent requests
    concurrency: usize,
    /// Per-request timeout (in seconds)
    timeout_secs: u64,
    /// User-Agent header sent with each request
    user_agent: String,
}

impl DownloadConfig {
    /// Create a new download configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the concurrency limit. Values below 1 are raised to 1.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Set the per-request timeout in seconds.
    pub fn with_timeout_secs(mut self, timeout: u64) -> Self {
        self.timeout_secs = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}
