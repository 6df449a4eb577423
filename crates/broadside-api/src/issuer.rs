//! [`SessionIssuer`] on top of the request surface.

use std::sync::Arc;

use broadside_protocol::SessionId;
use broadside_session::{SessionError, SessionIssuer};

use crate::{ApiError, Endpoint, GameApi, RawReply};

/// Obtains session identities from the authority's session endpoints.
///
/// The identity travels in the response header, not the body.
pub struct ApiSessionIssuer<A> {
    api: Arc<A>,
}

impl<A: GameApi> ApiSessionIssuer<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    async fn request_identity(
        &self,
        endpoint: Endpoint,
    ) -> Result<SessionId, ApiError> {
        let reply = self.api.call(&endpoint, None).await?;
        identity_from(reply)
    }
}

fn identity_from(reply: RawReply) -> Result<SessionId, ApiError> {
    if !reply.is_success() {
        return Err(ApiError::Rejected {
            status: reply.status,
            code: None,
        });
    }
    reply.session_header.ok_or(ApiError::MissingSessionHeader)
}

impl From<ApiError> for SessionError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::MissingSessionHeader => SessionError::MissingIdentity,
            other => SessionError::Issuer(Box::new(other)),
        }
    }
}

impl<A: GameApi> SessionIssuer for ApiSessionIssuer<A> {
    async fn create(&self) -> Result<SessionId, SessionError> {
        Ok(self.request_identity(Endpoint::CreateSession).await?)
    }

    async fn resume(&self, id: &SessionId) -> Result<SessionId, SessionError> {
        Ok(self
            .request_identity(Endpoint::ResumeSession(id.clone()))
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_from_header() {
        let reply = RawReply {
            session_header: Some(SessionId::new("s1")),
            ..RawReply::ok(r#"{"code":"ok","data":null}"#)
        };
        assert_eq!(identity_from(reply).unwrap(), SessionId::new("s1"));
    }

    #[test]
    fn test_identity_missing_header_maps_to_missing_identity() {
        let err = identity_from(RawReply::ok("{}")).unwrap_err();
        assert!(matches!(
            SessionError::from(err),
            SessionError::MissingIdentity
        ));
    }

    #[test]
    fn test_identity_error_status_maps_to_issuer_error() {
        let reply = RawReply {
            status: 500,
            session_header: Some(SessionId::new("ignored")),
            body: Vec::new(),
        };
        let err = SessionError::from(identity_from(reply).unwrap_err());
        assert!(err.to_string().contains("500"));

        let source = std::error::Error::source(&err).expect("source kept");
        assert!(matches!(
            source.downcast_ref::<ApiError>(),
            Some(ApiError::Rejected { status: 500, .. })
        ));
    }
}
