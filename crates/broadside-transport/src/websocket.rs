//! WebSocket push connection using `tokio-tungstenite`.

use futures_util::StreamExt;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use crate::{PushConnection, TransportError};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A client-side WebSocket connection to the push endpoint.
pub struct WebSocketPushConnection {
    url: String,
    ws: WsStream,
}

impl WebSocketPushConnection {
    /// Opens a connection to `url` (e.g. `ws://host/ws/<session>`).
    ///
    /// Resolves once the upgrade handshake has completed, i.e. when the
    /// connection is ready to deliver frames.
    pub async fn connect(url: &str) -> Result<Self, TransportError> {
        let (ws, _response) =
            tokio_tungstenite::connect_async(url).await.map_err(|e| {
                TransportError::ConnectFailed(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    e,
                ))
            })?;
        tracing::debug!(url, "push channel connected");
        Ok(Self {
            url: url.to_string(),
            ws,
        })
    }

    /// The address this connection was opened against.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl PushConnection for WebSocketPushConnection {
    type Error = TransportError;

    async fn recv(&mut self) -> Result<Option<Vec<u8>>, Self::Error> {
        loop {
            match self.ws.next().await {
                Some(Ok(Message::Text(text))) => {
                    return Ok(Some(text.as_bytes().to_vec()));
                }
                Some(Ok(Message::Binary(data))) => {
                    return Ok(Some(data.into()));
                }
                Some(Ok(Message::Close(_))) | None => return Ok(None),
                Some(Ok(_)) => continue, // ping/pong/raw frame
                Some(Err(e)) => {
                    return Err(TransportError::ReceiveFailed(
                        std::io::Error::new(
                            std::io::ErrorKind::ConnectionReset,
                            e,
                        ),
                    ));
                }
            }
        }
    }

    async fn close(&mut self) -> Result<(), Self::Error> {
        self.ws.close(None).await.map_err(|e| {
            TransportError::CloseFailed(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                e,
            ))
        })
    }
}
