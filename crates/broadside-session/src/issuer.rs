//! The hook the bootstrapper uses to obtain identities from the authority.
//!
//! The session layer doesn't speak HTTP. Instead it defines
//! [`SessionIssuer`]: two async methods that ask the authority for a new
//! identity or to resume an existing one. The API layer implements it over
//! the real request surface; tests implement it with a scripted fake.

use broadside_protocol::SessionId;

use crate::SessionError;

/// Obtains session identities from the authority.
///
/// # Example
///
/// ```rust
/// use broadside_protocol::SessionId;
/// use broadside_session::{SessionError, SessionIssuer};
///
/// /// Issues the same identity every time. Only useful offline.
/// struct FixedIssuer;
///
/// impl SessionIssuer for FixedIssuer {
///     async fn create(&self) -> Result<SessionId, SessionError> {
///         Ok(SessionId::new("fixed"))
///     }
///
///     async fn resume(
///         &self,
///         id: &SessionId,
///     ) -> Result<SessionId, SessionError> {
///         Ok(id.clone())
///     }
/// }
/// ```
pub trait SessionIssuer: Send + Sync + 'static {
    /// Asks the authority for a brand-new identity.
    fn create(
        &self,
    ) -> impl std::future::Future<Output = Result<SessionId, SessionError>> + Send;

    /// Asks the authority to resume `id`.
    ///
    /// Returns the identity the authority confirmed. This may differ from
    /// `id` when the authority no longer knows it and issued a new one
    /// instead.
    fn resume(
        &self,
        id: &SessionId,
    ) -> impl std::future::Future<Output = Result<SessionId, SessionError>> + Send;
}
