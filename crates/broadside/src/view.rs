//! View projection: what to render, derived from machine state.
//!
//! [`project`] is a pure function of the [`Machine`]. It owns nothing and
//! mutates nothing, so projecting the same state twice yields equal views.
//! Frontends (the terminal demo, tests) consume [`View`] values and never
//! look at [`Game`] directly.

use broadside_protocol::{
    AttemptResult, Game, GameId, Intcode, Orientation, Player, PlayerId,
    ShipId, ShipType,
};

use crate::{Machine, Mode};

/// Shown in place of the opponent id until someone joins.
pub const WAITING_FOR_PLAYER: &str = "WAITING FOR PLAYER TO JOIN.";

/// Shown in the lobby when the listing is empty.
pub const NO_GAMES: &str = "No games are available. Waiting for games to start...";

/// The whole screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// Session or push channel not ready yet.
    Loading,
    Lobby(Listing),
    Game(GameView),
}

/// The lobby's list of joinable games.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    /// No listing has arrived yet.
    Loading,
    /// The authority reported no open games.
    Empty,
    Games(Vec<GameId>),
}

/// The opponent line of the game header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpponentHeader {
    Waiting,
    Joined(PlayerId),
}

/// Display class of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellClass {
    #[default]
    Default,
    Hit,
    Miss,
}

impl From<AttemptResult> for CellClass {
    fn from(result: AttemptResult) -> Self {
        match result {
            AttemptResult::Unset => Self::Default,
            AttemptResult::Hit => Self::Hit,
            AttemptResult::Miss => Self::Miss,
        }
    }
}

/// One rendered cell.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CellView {
    /// The ship occupying the cell, when known.
    pub ship: Option<ShipId>,
    pub class: CellClass,
}

/// A rendered grid, row-major (`rows[y][x]`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    pub rows: Vec<Vec<CellView>>,
}

/// State of the opponent's board area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpponentBoard {
    /// Nobody has joined yet.
    AwaitingPlayer,
    /// The opponent is still placing ships.
    Waiting,
    Ready(BoardView),
}

/// Placement status of one ship type in the viewer's fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FleetStatus {
    Unplaced,
    /// Currently selected for placement.
    Selected(Orientation),
    Placed,
    Sunk,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FleetEntry {
    pub ship: ShipId,
    pub length: u32,
    pub status: FleetStatus,
}

/// The turn/result line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Banner {
    YourTurn,
    OpponentsTurn,
    YouWon,
    YouLost,
}

impl Banner {
    pub fn text(self) -> &'static str {
        match self {
            Self::YourTurn => "YOUR TURN",
            Self::OpponentsTurn => "OPPONENT'S TURN",
            Self::YouWon => "YOU WON! GAME OVER!",
            Self::YouLost => "YOU LOST! GAME OVER!",
        }
    }
}

impl std::fmt::Display for Banner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text())
    }
}

/// Everything shown while a game is current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameView {
    pub game: GameId,
    /// The viewer's seat, `None` if not seated.
    pub you: Option<PlayerId>,
    pub opponent: OpponentHeader,
    pub own_board: Option<BoardView>,
    pub fleet: Vec<FleetEntry>,
    pub opponent_board: OpponentBoard,
    pub banner: Banner,
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

/// Projects the machine state into a renderable view.
pub fn project(machine: &Machine) -> View {
    match machine.mode() {
        Mode::AwaitingSession | Mode::AwaitingChannel => View::Loading,
        Mode::Lobby => View::Lobby(match machine.directory() {
            None => Listing::Loading,
            Some([]) => Listing::Empty,
            Some(games) => Listing::Games(games.iter().map(|g| g.id.clone()).collect()),
        }),
        Mode::InGame => match machine.game() {
            Some(game) => View::Game(project_game(
                game,
                machine.intent().map(|i| (i.ship(), i.orientation())),
            )),
            None => View::Loading,
        },
    }
}

fn project_game(game: &Game, selected: Option<(&ShipId, Orientation)>) -> GameView {
    let you = game.you();
    let opponent = game.opponent();

    GameView {
        game: game.id.clone(),
        you: you.map(|p| p.id.clone()),
        opponent: match opponent {
            Some(p) => OpponentHeader::Joined(p.id.clone()),
            None => OpponentHeader::Waiting,
        },
        own_board: you.map(|p| board(p, &game.all_avail_ships)),
        fleet: you
            .map(|p| fleet(p, &game.all_avail_ships, selected))
            .unwrap_or_default(),
        opponent_board: match opponent {
            None => OpponentBoard::AwaitingPlayer,
            Some(p) if !p.all_ships_added => OpponentBoard::Waiting,
            Some(p) => OpponentBoard::Ready(board(p, &game.all_avail_ships)),
        },
        banner: banner(game),
    }
}

/// Finds the ship type with the given intcode. The empty marker never
/// resolves to a ship.
pub fn resolve_ship(ships: &[ShipType], code: Intcode) -> Option<&ShipType> {
    if code.is_empty() {
        return None;
    }
    ships.iter().find(|s| s.intcode == code)
}

/// Renders a player's grid: attacks received give the class, the
/// placement grid (when revealed) gives the ship.
fn board(player: &Player, ships: &[ShipType]) -> BoardView {
    let rows = player
        .grid_attempts
        .iter()
        .enumerate()
        .map(|(y, row)| {
            row.iter()
                .enumerate()
                .map(|(x, attempt)| {
                    let code = player
                        .grid
                        .as_ref()
                        .and_then(|grid| grid.get(y))
                        .and_then(|row| row.get(x))
                        .copied()
                        .unwrap_or(Intcode::EMPTY);
                    CellView {
                        ship: resolve_ship(ships, code).map(|s| s.id.clone()),
                        class: CellClass::from(*attempt),
                    }
                })
                .collect()
        })
        .collect();
    BoardView { rows }
}

fn fleet(
    you: &Player,
    ships: &[ShipType],
    selected: Option<(&ShipId, Orientation)>,
) -> Vec<FleetEntry> {
    ships
        .iter()
        .map(|ship_type| {
            let placed = you.ships.iter().find(|s| s.id == ship_type.id);
            let status = match (placed, selected) {
                (Some(ship), _) if ship.sunk => FleetStatus::Sunk,
                (Some(_), _) => FleetStatus::Placed,
                (None, Some((id, orientation))) if *id == ship_type.id => {
                    FleetStatus::Selected(orientation)
                }
                (None, _) => FleetStatus::Unplaced,
            };
            FleetEntry {
                ship: ship_type.id.clone(),
                length: ship_type.length,
                status,
            }
        })
        .collect()
}

fn banner(game: &Game) -> Banner {
    if !game.is_in_progress() {
        return if game.viewer_won() {
            Banner::YouWon
        } else {
            Banner::YouLost
        };
    }
    if game.you().is_some_and(|p| p.is_turn) {
        Banner::YourTurn
    } else {
        Banner::OpponentsTurn
    }
}

// =========================================================================
// Tests
// =========================================================================
