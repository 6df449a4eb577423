//! Game fixtures shared by the unit tests.

use std::collections::HashMap;

use broadside_protocol::{
    AttemptResult, Game, GameId, Intcode, Player, PlayerId, SessionId,
    ShipId, ShipType,
};

pub(crate) const SIZE: usize = 10;

pub(crate) fn sid(id: &str) -> SessionId {
    SessionId::new(id)
}

pub(crate) fn player(id: &str, is_turn: bool, with_grid: bool) -> Player {
    Player {
        id: PlayerId::new(id),
        is_turn,
        grid: with_grid.then(|| vec![vec![Intcode::EMPTY; SIZE]; SIZE]),
        grid_attempts: vec![vec![AttemptResult::Unset; SIZE]; SIZE],
        ships: Vec::new(),
        all_ships_added: false,
        sunk_all: false,
    }
}

fn fleet() -> Vec<ShipType> {
    vec![
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
    ]
}

/// `g1` right after creation: viewer `p1` seated, no opponent yet.
pub(crate) fn lone_game() -> Game {
    let mut players = HashMap::new();
    players.insert(PlayerId::new("p1"), player("p1", true, true));
    Game {
        id: GameId::new("g1"),
        players,
        player_id_you: Some(PlayerId::new("p1")),
        player_id_opponent: None,
        player_id_winner: None,
        player_id_turn: Some(PlayerId::new("p1")),
        game_status: Some(true),
        all_avail_ships: fleet(),
    }
}

/// `g1` with opponent `p2` seated. Both fleets count as placed when
/// `ready` is set.
pub(crate) fn game_with_opponent(you_turn: bool, ready: bool) -> Game {
    let mut game = lone_game();
    let mut you = player("p1", you_turn, true);
    you.all_ships_added = ready;
    let mut opponent = player("p2", !you_turn, false);
    opponent.all_ships_added = ready;
    game.players.insert(you.id.clone(), you);
    game.players.insert(opponent.id.clone(), opponent);
    game.player_id_opponent = Some(PlayerId::new("p2"));
    game.player_id_turn = Some(PlayerId::new(if you_turn { "p1" } else { "p2" }));
    game
}
