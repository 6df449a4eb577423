//! Error types for the API layer.

use broadside_protocol::ProtocolError;

/// Errors that can occur while talking to the authority.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP exchange itself failed (connect, timeout, body read).
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The authority answered with a non-success status.
    ///
    /// `code` is the envelope code (`"bad_ship_coords"`, ...) when the
    /// body carried one.
    #[error("request rejected with status {status} ({})", .code.as_deref().unwrap_or("no code"))]
    Rejected { status: u16, code: Option<String> },

    /// The response body did not match the expected payload.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session call succeeded but carried no identity header.
    #[error("response is missing the session header")]
    MissingSessionHeader,
}

impl ApiError {
    /// Returns `true` if this is a rejection carrying the given envelope
    /// code.
    pub fn is_code(&self, expected: &str) -> bool {
        matches!(self, Self::Rejected { code: Some(code), .. } if code == expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use broadside_protocol::codes;

    #[test]
    fn test_is_code_matches_rejection_code() {
        let err = ApiError::Rejected {
            status: 404,
            code: Some(codes::BAD_SHIP_COORDS.into()),
        };
        assert!(err.is_code(codes::BAD_SHIP_COORDS));
        assert!(!err.is_code(codes::NOT_YOUR_TURN));
    }

    #[test]
    fn test_is_code_false_without_code() {
        let err = ApiError::Rejected {
            status: 500,
            code: None,
        };
        assert!(!err.is_code(codes::BAD_SHIP_COORDS));
        assert!(err.to_string().contains("no code"));
    }
}
