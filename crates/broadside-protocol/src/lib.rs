//! Wire protocol for the Broadside client.
//!
//! This crate defines the typed data contracts for everything the client
//! exchanges with the game authority:
//!
//! - **Types** ([`Game`], [`Player`], [`GameSummary`], [`PushNotification`],
//!   [`ApiEnvelope`], ...): what travels on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those payloads are
//!   decoded from bytes.
//! - **Errors** ([`ProtocolError`]): what can go wrong while decoding.
//!
//! # Architecture
//!
//! The protocol layer sits below every other crate. It knows nothing about
//! HTTP, WebSockets, or the interaction state machine; it only validates
//! and deserializes payloads at the boundary.
//!
//! ```text
//! Transport / HTTP (bytes) → Protocol (typed values) → Client core
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    ApiEnvelope, AttemptResult, Coordinate, Game, GameId, GameSummary,
    Intcode, Orientation, Player, PlayerId, PushNotification, SESSION_HEADER,
    SessionId, Ship, ShipId, ShipType, codes,
};
