use broadside::prelude::*;
use broadside::{BoardView, CellClass, FleetStatus, GameView, NO_GAMES, WAITING_FOR_PLAYER};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

const HELP: &str = "\
commands:
  create                 start a new game
  join <game-id>         join an open game
  select <ship> <x|y>    pick a ship and orientation to place
  place <x> <y>          click a cell on your own board
  fire <x> <y>           click a cell on the opponent's board
  quit";

#[derive(Debug, PartialEq, Eq)]
enum Input {
    Action(UserAction),
    Help,
    Quit,
}

fn parse_input(line: &str) -> Result<Input, String> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let coordinate = |x: &str, y: &str| -> Result<Coordinate, String> {
        let x = x.parse().map_err(|_| format!("bad x coordinate: {x}"))?;
        let y = y.parse().map_err(|_| format!("bad y coordinate: {y}"))?;
        Ok(Coordinate::new(x, y))
    };

    let action = match words.as_slice() {
        [] | ["help"] => return Ok(Input::Help),
        ["quit"] | ["exit"] => return Ok(Input::Quit),
        ["create"] => UserAction::CreateGame,
        ["join", id] => UserAction::JoinGame(GameId::new(*id)),
        ["select", ship, orientation] => UserAction::SelectShip {
            ship: ShipId::new(*ship),
            orientation: match *orientation {
                "x" => Orientation::Horizontal,
                "y" => Orientation::Vertical,
                other => return Err(format!("orientation must be x or y, got {other}")),
            },
        },
        ["place", x, y] => UserAction::ClickCell {
            board: Board::Own,
            at: coordinate(x, y)?,
        },
        ["fire", x, y] => UserAction::ClickCell {
            board: Board::Opponent,
            at: coordinate(x, y)?,
        },
        _ => return Err(format!("unknown command: {line}")),
    };
    Ok(Input::Action(action))
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn render(view: &View) -> String {
    match view {
        View::Loading => "Loading...".to_string(),
        View::Lobby(Listing::Loading) => "Loading games...".to_string(),
        View::Lobby(Listing::Empty) => format!("{NO_GAMES}\n(type `create` to start one)"),
        View::Lobby(Listing::Games(games)) => {
            let mut out = String::from("Start a new game with `create`, or join one of these games:\n");
            for id in games {
                out.push_str(&format!("  join {id}\n"));
            }
            out
        }
        View::Game(game) => render_game(game),
    }
}

fn render_game(game: &GameView) -> String {
    let mut out = format!("Game: {}\n", game.game);
    out.push_str(&format!(
        "You Player: {}\n",
        game.you.as_ref().map_or("NONE".to_string(), ToString::to_string)
    ));
    match &game.opponent {
        OpponentHeader::Joined(id) => out.push_str(&format!("Opponent Player: {id}\n")),
        OpponentHeader::Waiting => {
            out.push_str(&format!("Opponent Player: {WAITING_FOR_PLAYER}\n"));
        }
    }
    out.push_str(&format!("\n{}\n\nYour fleet:\n", game.banner));
    for entry in &game.fleet {
        let status = match entry.status {
            FleetStatus::Unplaced => "-".to_string(),
            FleetStatus::Selected(o) => format!("selected ({o})"),
            FleetStatus::Placed => "placed".to_string(),
            FleetStatus::Sunk => "SUNK".to_string(),
        };
        out.push_str(&format!("  {} ({}): {status}\n", entry.ship, entry.length));
    }
    if let Some(board) = &game.own_board {
        out.push_str("\nYour board:\n");
        out.push_str(&render_board(board));
    }
    out.push_str("\nOpponent board:\n");
    match &game.opponent_board {
        OpponentBoard::AwaitingPlayer => out.push_str(WAITING_FOR_PLAYER),
        OpponentBoard::Waiting => out.push_str("Waiting for opponent to place ships..."),
        OpponentBoard::Ready(board) => out.push_str(&render_board(board)),
    }
    out
}

fn render_board(board: &BoardView) -> String {
    let width = board.rows.first().map_or(0, Vec::len);
    let mut out = String::from("   ");
    out.extend((0..width).map(|x| char::from_digit((x % 10) as u32, 10).unwrap_or('?')));
    out.push('\n');
    for (y, row) in board.rows.iter().enumerate() {
        out.push_str(&format!("{y:>2} "));
        out.extend(row.iter().map(|cell| match (cell.class, &cell.ship) {
            (CellClass::Hit, _) => 'X',
            (CellClass::Miss, _) => 'o',
            (CellClass::Default, Some(ship)) => ship
                .as_str()
                .chars()
                .next()
                .map_or('#', |c| c.to_ascii_uppercase()),
            (CellClass::Default, None) => '.',
        }));
        out.push('\n');
    }
    out
}

// ---------------------------------------------------------------------------
// Main loop
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so stdout stays readable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::from_env();
    tracing::info!(host = %config.host, "connecting");

    let Client {
        handle,
        mut views,
        mut alerts,
    } = broadside::spawn_http(&config)?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}\n\n{HELP}", render(&views.borrow_and_update()));

    loop {
        tokio::select! {
            changed = views.changed() => {
                if changed.is_err() {
                    break;
                }
                println!("\n{}", render(&views.borrow_and_update()));
            }
            Some(alert) = alerts.recv() => {
                println!("!! {alert}");
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_input(&line) {
                    Ok(Input::Action(action)) => handle.send(action).await?,
                    Ok(Input::Help) => println!("{HELP}"),
                    Ok(Input::Quit) => break,
                    Err(e) => println!("{e}"),
                }
            }
        }
    }

    Ok(())
}
