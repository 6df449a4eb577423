//! Client configuration.

use std::path::PathBuf;
use std::time::Duration;

use broadside_api::ApiConfig;
use broadside_session::SessionConfig;

/// Environment variable overriding [`ClientConfig::host`].
pub const HOST_ENV: &str = "BROADSIDE_HOST";

/// Environment variable overriding [`ClientConfig::storage_dir`].
pub const STATE_DIR_ENV: &str = "BROADSIDE_STATE_DIR";

/// Everything needed to start a client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// `host:port` of the authority. Requests go to `http://<host>`, the
    /// push channel to `ws://<host>/ws/<session>`.
    pub host: String,

    /// Directory the session identity is persisted in.
    pub storage_dir: PathBuf,

    /// Capacity of the channels feeding the driver loop.
    pub event_channel_capacity: usize,

    /// Upper bound on one request to the authority.
    pub request_timeout: Duration,

    /// Session bootstrap settings.
    pub session: SessionConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "localhost:8888".to_string(),
            storage_dir: PathBuf::from(".broadside"),
            event_channel_capacity: 64,
            request_timeout: Duration::from_secs(10),
            session: SessionConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Defaults, overridden by `BROADSIDE_HOST` and `BROADSIDE_STATE_DIR`
    /// when set.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(host) = lookup(HOST_ENV).filter(|h| !h.is_empty()) {
            config.host = host;
        }
        if let Some(dir) = lookup(STATE_DIR_ENV).filter(|d| !d.is_empty()) {
            config.storage_dir = PathBuf::from(dir);
        }
        config
    }

    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    #[must_use]
    pub fn with_storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = dir.into();
        self
    }

    #[must_use]
    pub fn with_session(mut self, session: SessionConfig) -> Self {
        self.session = session;
        self
    }

    /// Request-surface settings derived from this config.
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig::default()
            .with_base_url(format!("http://{}", self.host))
            .with_request_timeout(self.request_timeout)
    }

    /// Base URL of the push channel, without the session path.
    pub fn push_base(&self) -> String {
        format!("ws://{}", self.host)
    }
}
