//! Codec trait and implementations for turning payload bytes into types.
//!
//! The authority speaks JSON on both the request/response surface and the
//! push channel, so [`JsonCodec`] is the only implementation. Callers hold a
//! `C: Codec` instead of calling `serde_json` directly, which keeps the
//! decode-failure path in one place: every malformed payload becomes a
//! [`ProtocolError::Decode`].

use serde::de::DeserializeOwned;

use crate::ProtocolError;

/// A codec that decodes payload bytes into Rust types.
///
/// The client only reads payloads: requests carry everything in the path.
///
/// `Send + Sync + 'static` so a codec can live inside the long-running
/// driver task and be shared with spawned request tasks.
pub trait Codec: Send + Sync + 'static {
    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed,
    /// incomplete, or don't match the expected type.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// ## Example
///
/// ```rust
/// use broadside_protocol::{Codec, JsonCodec, PushNotification};
///
/// let codec = JsonCodec;
/// let note: PushNotification = codec
///     .decode(br#"{"action": "refresh_game"}"#)
///     .unwrap();
/// assert_eq!(note, PushNotification::RefreshGame);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ApiEnvelope, GameSummary};

    #[test]
    fn test_json_codec_decodes_listing_envelope() {
        let body = br#"{"code": "ok", "data": [{"id": "a"}, {"id": "b"}]}"#;
        let env: ApiEnvelope<Vec<GameSummary>> =
            JsonCodec.decode(body).unwrap();
        assert_eq!(env.data.len(), 2);
        assert_eq!(env.data[1].id.as_str(), "b");
    }

    #[test]
    fn test_json_codec_decode_garbage_is_decode_error() {
        let result: Result<GameSummary, _> = JsonCodec.decode(b"not json");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_json_codec_decode_illegal_attempt_value_is_decode_error() {
        let result: Result<crate::AttemptResult, _> = JsonCodec.decode(b"7");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }
}
