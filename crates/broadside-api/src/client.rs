//! Typed clients for the lobby directory and for one game's state.
//!
//! Both wrap a shared [`GameApi`] and the process session identity, and
//! turn each reply into a typed value or an [`ApiError`]. Neither caches
//! anything: every call returns a fresh authoritative value and the caller
//! decides what to replace.

use std::sync::Arc;

use broadside_protocol::{
    ApiEnvelope, Codec, Game, GameId, GameSummary, JsonCodec, SessionId,
};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Deserialize;

use crate::{ApiError, Endpoint, GameApi, PlaceShip, RawReply, SubmitMove};

/// Body of an error response. Only the code is of interest; the payload
/// is usually `null`.
#[derive(Deserialize)]
struct RejectionBody {
    code: Option<String>,
}

/// Interprets a reply as a `{code, data}` envelope around `T`.
///
/// # Errors
/// - [`ApiError::Rejected`] for a non-success status, with the envelope
///   code when the body has one.
/// - [`ApiError::Protocol`] if a success body does not decode as `T`.
pub fn interpret<T: DeserializeOwned>(reply: &RawReply) -> Result<T, ApiError> {
    if !reply.is_success() {
        let code = JsonCodec
            .decode::<RejectionBody>(&reply.body)
            .ok()
            .and_then(|body| body.code);
        return Err(ApiError::Rejected {
            status: reply.status,
            code,
        });
    }
    let envelope: ApiEnvelope<T> = JsonCodec.decode(&reply.body)?;
    Ok(envelope.data)
}

// ---------------------------------------------------------------------------
// DirectoryClient
// ---------------------------------------------------------------------------

/// Lists, creates, and joins games.
pub struct DirectoryClient<A> {
    api: Arc<A>,
    session: SessionId,
}

impl<A> Clone for DirectoryClient<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            session: self.session.clone(),
        }
    }
}

impl<A: GameApi> DirectoryClient<A> {
    pub fn new(api: Arc<A>, session: SessionId) -> Self {
        Self { api, session }
    }

    /// Fetches every open game. An empty listing is a valid answer.
    pub async fn list_games(&self) -> Result<Vec<GameSummary>, ApiError> {
        let reply = self
            .api
            .call(&Endpoint::ListGames, Some(&self.session))
            .await?;
        interpret(&reply)
    }

    /// Creates a game with the viewer seated in it.
    pub async fn create_game(&self) -> Result<Game, ApiError> {
        let reply = self
            .api
            .call(&Endpoint::CreateGame, Some(&self.session))
            .await?;
        interpret(&reply)
    }

    /// Takes the free seat in an existing game.
    pub async fn join_game(&self, game: &GameId) -> Result<Game, ApiError> {
        let reply = self
            .api
            .call(&Endpoint::JoinGame(game.clone()), Some(&self.session))
            .await?;
        interpret(&reply)
    }
}

// ---------------------------------------------------------------------------
// GameClient
// ---------------------------------------------------------------------------

/// Reads and mutates one game.
pub struct GameClient<A> {
    api: Arc<A>,
    session: SessionId,
}

impl<A> Clone for GameClient<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            session: self.session.clone(),
        }
    }
}

impl<A: GameApi> GameClient<A> {
    pub fn new(api: Arc<A>, session: SessionId) -> Self {
        Self { api, session }
    }

    /// Fetches the full authoritative state of `game`.
    pub async fn fetch_game(&self, game: &GameId) -> Result<Game, ApiError> {
        let reply = self
            .api
            .call(&Endpoint::FetchGame(game.clone()), Some(&self.session))
            .await?;
        interpret(&reply)
    }

    /// Places a ship. Success carries no payload.
    ///
    /// # Errors
    /// An invalid placement comes back as [`ApiError::Rejected`] with code
    /// `bad_ship_coords`.
    pub async fn place_ship(&self, request: PlaceShip) -> Result<(), ApiError> {
        let reply = self
            .api
            .call(&Endpoint::PlaceShip(request), Some(&self.session))
            .await?;
        interpret::<IgnoredAny>(&reply).map(|_| ())
    }

    /// Submits an attack. The move details in the success body are not
    /// interpreted; a subsequent fetch is the source of truth.
    pub async fn submit_move(&self, request: SubmitMove) -> Result<(), ApiError> {
        let reply = self
            .api
            .call(&Endpoint::SubmitMove(request), Some(&self.session))
            .await?;
        interpret::<IgnoredAny>(&reply).map(|_| ())
    }
}
