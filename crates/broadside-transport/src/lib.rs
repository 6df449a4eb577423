//! Push-channel transport for Broadside.
//!
//! Provides the [`PushConnection`] trait the client core reads push
//! notifications through, and a WebSocket implementation of it.
//!
//! The channel is receive-mostly: the authority pushes small JSON frames
//! telling the client *that* something changed, and the client re-fetches
//! the state itself over HTTP. This crate only moves bytes; decoding the
//! frames is the protocol layer's job.
//!
//! # Feature Flags
//!
//! - `websocket` (default): WebSocket transport via `tokio-tungstenite`

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::WebSocketPushConnection;

/// Builds the push-channel address for a session: `<base>/ws/<session>`.
///
/// `base` is the scheme and host, e.g. `ws://localhost:8888`. A trailing
/// slash on `base` is tolerated.
pub fn push_url(base: &str, session: &str) -> String {
    format!("{}/ws/{session}", base.trim_end_matches('/'))
}

/// One long-lived connection to the authority's push endpoint.
///
/// There is exactly one reader (the push task of the client driver), so
/// methods take `&mut self`.
pub trait PushConnection: Send + 'static {
    /// The error type for connection operations.
    type Error: std::error::Error + Send + Sync;

    /// Receives the next frame payload.
    ///
    /// Text and binary frames are both returned as bytes. Control frames
    /// are skipped. Returns `Ok(None)` when the connection is cleanly
    /// closed.
    async fn recv(&mut self) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Starts the close handshake.
    async fn close(&mut self) -> Result<(), Self::Error>;
}
