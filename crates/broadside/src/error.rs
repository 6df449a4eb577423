//! Unified error type for the Broadside client.

use broadside_api::ApiError;
use broadside_protocol::ProtocolError;
use broadside_session::SessionError;
use broadside_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `broadside` crate you deal with this single error type
/// instead of importing errors from each layer. The `#[from]` attribute on
/// each variant lets `?` convert layer errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum BroadsideError {
    /// A push-channel error (connect, recv, close).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A payload failed to decode.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Session bootstrap or persistence failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A request to the authority failed or was rejected.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The client's driver task is no longer running.
    #[error("client driver has stopped")]
    ClientStopped,
}
