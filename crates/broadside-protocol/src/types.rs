//! Core wire types for the Broadside client.
//!
//! Every type here mirrors a payload the game authority sends or accepts.
//! The client never patches these values. A fresh [`Game`] replaces the
//! cached one wholesale, so they are plain data with a few read-only
//! helpers.
//!
//! Two numeric encodings need care: the authority stores grids as float
//! arrays, so cell values may arrive as `1.0` instead of `1`. [`Intcode`] and
//! [`AttemptResult`] accept both and reject anything that is not one of
//! their legal values. A payload with an illegal cell fails to decode as a
//! whole; it is never half-applied.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of the header that carries the session identity, both on requests
/// (as a credential) and on session responses (as the issued identity).
pub const SESSION_HEADER: &str = "X-Bs-Session-Id";

/// Error codes the authority puts in the envelope `code` field.
pub mod codes {
    /// Success.
    pub const OK: &str = "ok";
    /// A ship placement was out of bounds, overlapping, or malformed.
    pub const BAD_SHIP_COORDS: &str = "bad_ship_coords";
    /// A move was submitted out of turn.
    pub const NOT_YOUR_TURN: &str = "not_your_turn";
    /// The request carried no (or an unknown) session identity.
    pub const NO_SESSION_ID: &str = "no_session_id";
    /// The referenced game does not exist.
    pub const GAME_NOT_FOUND: &str = "game_not_found";
}

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Declares an opaque string identifier.
///
/// All identifiers the authority issues are UUID strings. Wrapping each in
/// its own type keeps a `GameId` from being passed where a `PlayerId` is
/// expected. `#[serde(transparent)]` keeps the wire form a bare string.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps a raw identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id! {
    /// The identity issued to one client instance for its process lifetime.
    SessionId
}

string_id! {
    /// Identifies one game on the authority.
    GameId
}

string_id! {
    /// Identifies one player seat within a game.
    PlayerId
}

string_id! {
    /// Identifies a ship type (`"carrier"`, `"destroyer"`, ...).
    ShipId
}

// ---------------------------------------------------------------------------
// Grid cell encodings
// ---------------------------------------------------------------------------

/// The integer marker written into a grid cell. `0` means empty; any other
/// value is the `intcode` of the ship occupying the cell.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "f64", into = "u32")]
pub struct Intcode(u32);

impl Intcode {
    /// The empty-cell marker.
    pub const EMPTY: Intcode = Intcode(0);

    /// Wraps a raw marker.
    pub const fn new(code: u32) -> Self {
        Self(code)
    }

    /// Returns the raw marker.
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Returns `true` for the empty-cell marker.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl TryFrom<f64> for Intcode {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if value.fract() != 0.0 || value < 0.0 || value > f64::from(u32::MAX) {
            return Err(format!("invalid intcode {value}"));
        }
        Ok(Self(value as u32))
    }
}

impl From<Intcode> for u32 {
    fn from(code: Intcode) -> Self {
        code.0
    }
}

impl fmt::Display for Intcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The recorded outcome of an attack on one cell.
///
/// Encoded on the wire as `0` (unset), `1` (hit), `2` (miss). No other value
/// is accepted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "f64", into = "u8")]
pub enum AttemptResult {
    /// The cell has not been attacked.
    #[default]
    Unset,
    /// The cell was attacked and held a ship.
    Hit,
    /// The cell was attacked and was empty.
    Miss,
}

impl TryFrom<f64> for AttemptResult {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        // Exact equality is fine: the authority writes small integers.
        if value == 0.0 {
            Ok(Self::Unset)
        } else if value == 1.0 {
            Ok(Self::Hit)
        } else if value == 2.0 {
            Ok(Self::Miss)
        } else {
            Err(format!("invalid attempt result {value}"))
        }
    }
}

impl From<AttemptResult> for u8 {
    fn from(result: AttemptResult) -> Self {
        match result {
            AttemptResult::Unset => 0,
            AttemptResult::Hit => 1,
            AttemptResult::Miss => 2,
        }
    }
}

// ---------------------------------------------------------------------------
// Coordinates and orientation
// ---------------------------------------------------------------------------

/// A zero-based cell address. Grids are row-major, so a cell is read as
/// `grid[y][x]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: u32,
    pub y: u32,
}

impl Coordinate {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Formats as the `x-y` path segment the authority expects.
impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.x, self.y)
    }
}

/// The direction a ship extends from its anchor cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Extends along increasing `x`.
    #[serde(rename = "x")]
    Horizontal,
    /// Extends along increasing `y`.
    #[serde(rename = "y")]
    Vertical,
}

impl Orientation {
    /// Returns the single-letter wire code (`"x"` or `"y"`).
    pub const fn code(self) -> &'static str {
        match self {
            Self::Horizontal => "x",
            Self::Vertical => "y",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ---------------------------------------------------------------------------
// Ships
// ---------------------------------------------------------------------------

/// A ship type every player must place exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipType {
    pub id: ShipId,
    pub intcode: Intcode,
    pub length: u32,
}

/// A ship a player has placed on their grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ship {
    pub id: ShipId,
    pub intcode: Intcode,
    pub length: u32,
    #[serde(default)]
    pub hits: u32,
    /// Set once every cell of the ship has been hit.
    #[serde(default)]
    pub sunk: bool,
}

// ---------------------------------------------------------------------------
// Players and games
// ---------------------------------------------------------------------------

/// One seat in a game, as seen by the viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,

    /// Whether this player may submit the next move.
    pub is_turn: bool,

    /// Ship placement grid. The authority only reveals it for the viewer's
    /// own seat; for the opponent it is `null`.
    #[serde(default)]
    pub grid: Option<Vec<Vec<Intcode>>>,

    /// Attacks this player has *received*.
    pub grid_attempts: Vec<Vec<AttemptResult>>,

    /// Placed ships. For the opponent only sunk ships are listed.
    #[serde(default)]
    pub ships: Vec<Ship>,

    pub all_ships_added: bool,

    #[serde(default)]
    pub sunk_all: bool,
}

impl Player {
    /// Returns `true` if this player has already placed the given ship.
    pub fn has_placed(&self, ship: &ShipId) -> bool {
        self.ships.iter().any(|s| &s.id == ship)
    }
}

/// The authoritative state of one game from the viewer's perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,

    #[serde(default)]
    pub players: HashMap<PlayerId, Player>,

    pub player_id_you: Option<PlayerId>,

    pub player_id_opponent: Option<PlayerId>,

    #[serde(default)]
    pub player_id_winner: Option<PlayerId>,

    #[serde(default)]
    pub player_id_turn: Option<PlayerId>,

    /// `true` while the game is running, `false` once concluded. The
    /// authority leaves it `null` until the first player is seated.
    #[serde(default)]
    pub game_status: Option<bool>,

    #[serde(default)]
    pub all_avail_ships: Vec<ShipType>,
}

impl Game {
    /// The viewer's own seat, if the viewer is seated.
    pub fn you(&self) -> Option<&Player> {
        self.player_id_you
            .as_ref()
            .and_then(|id| self.players.get(id))
    }

    /// The opposing seat, if an opponent has joined.
    pub fn opponent(&self) -> Option<&Player> {
        self.player_id_opponent
            .as_ref()
            .and_then(|id| self.players.get(id))
    }

    /// Returns `true` until the authority reports the game concluded.
    pub fn is_in_progress(&self) -> bool {
        self.game_status != Some(false)
    }

    /// Returns `true` if the game is over and the viewer won it.
    pub fn viewer_won(&self) -> bool {
        !self.is_in_progress()
            && self.player_id_winner.is_some()
            && self.player_id_winner == self.player_id_you
    }

    /// Looks up a ship type by id.
    pub fn ship_type(&self, ship: &ShipId) -> Option<&ShipType> {
        self.all_avail_ships.iter().find(|s| &s.id == ship)
    }
}

/// A lobby entry. The listing payload carries a full game export per entry;
/// only the id is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub id: GameId,
}

// ---------------------------------------------------------------------------
// Envelopes
// ---------------------------------------------------------------------------

/// The body wrapper every API response uses.
///
/// ```text
/// { "code": "ok", "data": { ...endpoint payload... } }
/// ```
///
/// Error responses keep the same shape with a non-`ok` code and usually a
/// `null` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub code: String,
    pub data: T,
}

/// A server-to-client notification on the push channel.
///
/// Internally tagged on `action`:
/// `{ "action": "refresh_game" }`. Unknown actions decode as
/// [`PushNotification::Unknown`] so newer servers don't break older clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PushNotification {
    /// The lobby listing may have changed.
    RefreshGames,
    /// The game the viewer is seated in may have changed.
    RefreshGame,
    /// Any action this client does not understand.
    #[serde(other)]
    Unknown,
}

// =========================================================================
// Tests
// =========================================================================
