//! Error types for the protocol layer.
//!
//! Each Broadside crate defines its own error enum. A `ProtocolError` always
//! means a payload could not be turned into the typed data contracts in
//! [`crate::types`]; the network itself was fine.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Deserialization failed: malformed JSON, a missing required field,
    /// or a cell value outside its legal set.
    #[error("decode failed: {0}")]
    Decode(#[source] serde_json::Error),
}
