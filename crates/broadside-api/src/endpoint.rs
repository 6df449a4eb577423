//! Endpoint catalogue and guarded request construction.
//!
//! Every call the client makes is an [`Endpoint`] value: a method plus a
//! templated path. The two state-changing game calls, [`PlaceShip`] and
//! [`SubmitMove`], can only be built through constructors that check the
//! cached [`Game`] first. A failed check returns a [`LocalRejection`]
//! and no request value exists to send.

use std::fmt;

use broadside_protocol::{
    Coordinate, Game, GameId, Orientation, PlayerId, SessionId, ShipId,
};

/// HTTP method of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
}

impl Method {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Local preconditions
// ---------------------------------------------------------------------------

/// A state-changing request refused before anything was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LocalRejection {
    /// The viewer has no seat in the cached game.
    #[error("viewer is not seated in this game")]
    NotSeated,

    /// The viewer tried to attack out of turn.
    #[error("it is not the viewer's turn")]
    NotYourTurn,

    /// The game has concluded.
    #[error("the game is over")]
    GameOver,
}

/// The ship the viewer picked for placement and which way it faces.
///
/// Only obtainable through [`PlacementIntent::select`], which refuses
/// ships the game does not offer and ships the viewer already placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementIntent {
    ship: ShipId,
    orientation: Orientation,
}

impl PlacementIntent {
    /// Selects `ship` for placement, or returns `None` if the selection
    /// would have no effect.
    pub fn select(
        game: &Game,
        ship: ShipId,
        orientation: Orientation,
    ) -> Option<Self> {
        let you = game.you()?;
        if game.ship_type(&ship).is_none() || you.has_placed(&ship) {
            return None;
        }
        Some(Self { ship, orientation })
    }

    pub fn ship(&self) -> &ShipId {
        &self.ship
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }
}

// ---------------------------------------------------------------------------
// Guarded requests
// ---------------------------------------------------------------------------

/// A validated ship-placement request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceShip {
    pub game: GameId,
    pub player: PlayerId,
    pub ship: ShipId,
    pub at: Coordinate,
    pub orientation: Orientation,
}

impl PlaceShip {
    /// Builds the placement of `intent` anchored at `at`.
    ///
    /// # Errors
    /// [`LocalRejection::NotSeated`] if the viewer has no seat.
    pub fn new(
        game: &Game,
        intent: &PlacementIntent,
        at: Coordinate,
    ) -> Result<Self, LocalRejection> {
        let player = game
            .player_id_you
            .clone()
            .filter(|id| game.players.contains_key(id))
            .ok_or(LocalRejection::NotSeated)?;
        Ok(Self {
            game: game.id.clone(),
            player,
            ship: intent.ship.clone(),
            at,
            orientation: intent.orientation,
        })
    }
}

/// A validated attack move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitMove {
    pub game: GameId,
    pub player: PlayerId,
    pub at: Coordinate,
}

impl SubmitMove {
    /// Builds an attack on the opponent cell `at`.
    ///
    /// # Errors
    /// - [`LocalRejection::NotSeated`] if the viewer has no seat.
    /// - [`LocalRejection::GameOver`] once the game has concluded.
    /// - [`LocalRejection::NotYourTurn`] if the viewer's `is_turn` is false.
    pub fn new(game: &Game, at: Coordinate) -> Result<Self, LocalRejection> {
        let you = game.you().ok_or(LocalRejection::NotSeated)?;
        if !game.is_in_progress() {
            return Err(LocalRejection::GameOver);
        }
        if !you.is_turn {
            return Err(LocalRejection::NotYourTurn);
        }
        Ok(Self {
            game: game.id.clone(),
            player: you.id.clone(),
            at,
        })
    }
}

// ---------------------------------------------------------------------------
// Endpoint
// ---------------------------------------------------------------------------

/// One call on the authority's request/response surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    CreateSession,
    ResumeSession(SessionId),
    ListGames,
    CreateGame,
    JoinGame(GameId),
    FetchGame(GameId),
    PlaceShip(PlaceShip),
    SubmitMove(SubmitMove),
}

impl Endpoint {
    pub fn method(&self) -> Method {
        match self {
            Self::ResumeSession(_) | Self::ListGames | Self::FetchGame(_) => {
                Method::Get
            }
            Self::CreateSession | Self::CreateGame | Self::JoinGame(_) => {
                Method::Post
            }
            Self::PlaceShip(_) | Self::SubmitMove(_) => Method::Put,
        }
    }

    /// The request path, ids substituted.
    pub fn path(&self) -> String {
        match self {
            Self::CreateSession => "/api/sessions".to_string(),
            Self::ResumeSession(id) => format!("/api/sessions/{id}"),
            Self::ListGames | Self::CreateGame => "/api/games".to_string(),
            Self::JoinGame(game) => format!("/api/games/{game}/players"),
            Self::FetchGame(game) => format!("/api/games/{game}"),
            Self::PlaceShip(p) => format!(
                "/api/games/{}/players/{}/ships/{}/{}-{}",
                p.game, p.player, p.ship, p.at, p.orientation
            ),
            Self::SubmitMove(m) => format!(
                "/api/games/{}/players/{}/moves/{}",
                m.game, m.player, m.at
            ),
        }
    }

    /// Whether the call carries the session credential header. Only the
    /// calls that obtain the identity go without it.
    pub fn requires_session(&self) -> bool {
        !matches!(self, Self::CreateSession | Self::ResumeSession(_))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method(), self.path())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use broadside_protocol::{Intcode, Player, Ship, ShipType};

    use super::*;

    fn player(id: &str, is_turn: bool, ships: &[&str]) -> Player {
        Player {
            id: PlayerId::new(id),
            is_turn,
            grid: None,
            grid_attempts: Vec::new(),
            ships: ships
                .iter()
                .map(|s| Ship {
                    id: ShipId::new(*s),
                    intcode: Intcode::new(3),
                    length: 3,
                    hits: 0,
                    sunk: false,
                })
                .collect(),
            all_ships_added: false,
            sunk_all: false,
        }
    }

    fn game(you_turn: bool, placed: &[&str]) -> Game {
        let mut players = HashMap::new();
        players.insert(PlayerId::new("p1"), player("p1", you_turn, placed));
        players.insert(PlayerId::new("p2"), player("p2", !you_turn, &[]));
        Game {
            id: GameId::new("g1"),
            players,
            player_id_you: Some(PlayerId::new("p1")),
            player_id_opponent: Some(PlayerId::new("p2")),
            player_id_winner: None,
            player_id_turn: None,
            game_status: Some(true),
            all_avail_ships: vec![
                ShipType {
                    id: ShipId::new("cruiser"),
                    intcode: Intcode::new(3),
                    length: 3,
                },
                ShipType {
                    id: ShipId::new("destroyer"),
                    intcode: Intcode::new(5),
                    length: 2,
                },
            ],
        }
    }

    // =====================================================================
    // Endpoint paths
    // =====================================================================

    #[test]
    fn test_endpoint_paths_and_methods() {
        let g = GameId::new("g1");
        let cases = [
            (Endpoint::CreateSession, "POST /api/sessions"),
            (
                Endpoint::ResumeSession(SessionId::new("s1")),
                "GET /api/sessions/s1",
            ),
            (Endpoint::ListGames, "GET /api/games"),
            (Endpoint::CreateGame, "POST /api/games"),
            (Endpoint::JoinGame(g.clone()), "POST /api/games/g1/players"),
            (Endpoint::FetchGame(g), "GET /api/games/g1"),
        ];
        for (endpoint, expected) in cases {
            assert_eq!(endpoint.to_string(), expected);
        }
    }

    #[test]
    fn test_place_ship_path_encodes_coordinate_and_orientation() {
        let game = game(true, &[]);
        let intent = PlacementIntent::select(
            &game,
            ShipId::new("cruiser"),
            Orientation::Horizontal,
        )
        .unwrap();
        let request = PlaceShip::new(&game, &intent, Coordinate::new(2, 4)).unwrap();

        let endpoint = Endpoint::PlaceShip(request);
        assert_eq!(endpoint.method(), Method::Put);
        assert_eq!(
            endpoint.path(),
            "/api/games/g1/players/p1/ships/cruiser/2-4-x"
        );
    }

    #[test]
    fn test_submit_move_path_encodes_coordinate() {
        let request = SubmitMove::new(&game(true, &[]), Coordinate::new(7, 0)).unwrap();
        assert_eq!(
            Endpoint::SubmitMove(request).path(),
            "/api/games/g1/players/p1/moves/7-0"
        );
    }

    #[test]
    fn test_requires_session_false_only_for_session_calls() {
        assert!(!Endpoint::CreateSession.requires_session());
        assert!(!Endpoint::ResumeSession(SessionId::new("s")).requires_session());
        assert!(Endpoint::ListGames.requires_session());
        assert!(Endpoint::FetchGame(GameId::new("g")).requires_session());
    }

    // =====================================================================
    // Guards
    // =====================================================================

    #[test]
    fn test_submit_move_out_of_turn_is_rejected() {
        let result = SubmitMove::new(&game(false, &[]), Coordinate::new(0, 0));
        assert_eq!(result, Err(LocalRejection::NotYourTurn));
    }

    #[test]
    fn test_submit_move_after_game_over_is_rejected() {
        let mut game = game(true, &[]);
        game.game_status = Some(false);
        let result = SubmitMove::new(&game, Coordinate::new(0, 0));
        assert_eq!(result, Err(LocalRejection::GameOver));
    }

    #[test]
    fn test_submit_move_without_seat_is_rejected() {
        let mut game = game(true, &[]);
        game.player_id_you = None;
        let result = SubmitMove::new(&game, Coordinate::new(0, 0));
        assert_eq!(result, Err(LocalRejection::NotSeated));
    }

    #[test]
    fn test_select_unknown_ship_returns_none() {
        let game = game(true, &[]);
        let intent = PlacementIntent::select(
            &game,
            ShipId::new("rowboat"),
            Orientation::Vertical,
        );
        assert!(intent.is_none());
    }

    #[test]
    fn test_select_placed_ship_returns_none() {
        let game = game(true, &["cruiser"]);
        assert!(
            PlacementIntent::select(&game, ShipId::new("cruiser"), Orientation::Vertical)
                .is_none()
        );
        assert!(
            PlacementIntent::select(&game, ShipId::new("destroyer"), Orientation::Vertical)
                .is_some()
        );
    }
}
