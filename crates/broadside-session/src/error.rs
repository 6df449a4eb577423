//! Error types for the session layer.

/// Errors that can occur while resolving or persisting the session
/// identity.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Reading or writing persisted storage failed.
    #[error("session storage failed: {0}")]
    Storage(#[source] std::io::Error),

    /// The authority refused or failed to issue an identity. The source is
    /// the issuer's own error (transport failure, error status, ...).
    #[error("session issuer failed: {0}")]
    Issuer(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The authority answered without an identity.
    #[error("session response carried no identity")]
    MissingIdentity,
}
