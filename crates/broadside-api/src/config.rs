//! HTTP client configuration.

use std::time::Duration;

/// Where the authority lives and how long to wait for it.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to, e.g.
    /// `http://localhost:8888`.
    pub base_url: String,

    /// Upper bound on one request, connect through body.
    ///
    /// Default: 10 seconds.
    pub request_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8888".to_string(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl ApiConfig {
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
