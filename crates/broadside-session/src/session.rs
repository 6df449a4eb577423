//! Session types: the resolved identity and how it was obtained.

use broadside_protocol::SessionId;

/// Storage key the identity is persisted under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "bs-session-id";

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Configuration for session bootstrap.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Key (file name, for [`FileSessionStore`](crate::FileSessionStore))
    /// the identity is persisted under.
    pub storage_key: String,

    /// Whether a stored identity should be resumed. When `false` a fresh
    /// identity is always created (and still persisted).
    ///
    /// Default: `true`.
    pub resume: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            resume: true,
        }
    }
}

impl SessionConfig {
    /// Overrides the storage key.
    #[must_use]
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Enables or disables resuming a stored identity.
    #[must_use]
    pub fn with_resume(mut self, resume: bool) -> Self {
        self.resume = resume;
        self
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// How the active identity was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOrigin {
    /// The authority issued a new identity.
    Created,
    /// The authority accepted the stored identity.
    Resumed,
}

/// The identity this process uses for its whole lifetime.
///
/// Resolved once at startup and never replaced; a different identity
/// requires a restart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: SessionId,
    pub origin: SessionOrigin,
}
