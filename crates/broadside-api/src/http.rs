//! The request seam and its HTTP implementation.
//!
//! [`GameApi`] is the one place bytes leave the client for the authority.
//! Everything above it works with [`Endpoint`] values and decoded types;
//! everything below it is HTTP. Tests substitute an in-process fake.

use broadside_protocol::{SESSION_HEADER, SessionId};

use crate::{ApiConfig, ApiError, Endpoint, Method};

/// An undecoded response: status, the session header if present, and the
/// raw body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReply {
    pub status: u16,
    pub session_header: Option<SessionId>,
    pub body: Vec<u8>,
}

impl RawReply {
    /// A `200` reply with the given body and no session header.
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            session_header: None,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs one endpoint call against the authority.
pub trait GameApi: Send + Sync + 'static {
    /// Sends `endpoint`, attaching `session` as the credential header when
    /// given.
    ///
    /// # Errors
    /// Only transport failures are errors here. A non-success status is a
    /// normal [`RawReply`]; interpreting it is the caller's job.
    fn call(
        &self,
        endpoint: &Endpoint,
        session: Option<&SessionId>,
    ) -> impl std::future::Future<Output = Result<RawReply, ApiError>> + Send;
}

/// [`GameApi`] over HTTP, using `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpApi {
    /// Builds an HTTP client for the configured authority.
    ///
    /// # Errors
    /// Returns [`ApiError::Http`] if the underlying client cannot be
    /// constructed.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl GameApi for HttpApi {
    async fn call(
        &self,
        endpoint: &Endpoint,
        session: Option<&SessionId>,
    ) -> Result<RawReply, ApiError> {
        let method = match endpoint.method() {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
        };
        let url = format!("{}{}", self.base_url, endpoint.path());

        let mut request = self
            .client
            .request(method, url)
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        if let Some(session) = session {
            request = request.header(SESSION_HEADER, session.as_str());
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let session_header = response
            .headers()
            .get(SESSION_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(SessionId::new);
        let body = response.bytes().await?.to_vec();

        tracing::debug!(%endpoint, status, "authority replied");
        Ok(RawReply {
            status,
            session_header,
            body,
        })
    }
}
