//! The interaction state machine.
//!
//! [`Machine`] owns every piece of client state: the session, whether the
//! push channel is open, the cached lobby listing, the cached game, and
//! the transient placement intent. It is synchronous and does no I/O.
//! Each [`Event`] goes through [`Machine::handle`], which updates state
//! and returns the [`Effect`]s the driver must carry out.
//!
//! ```text
//!   AwaitingSession ──SessionResolved──→ AwaitingChannel
//!   AwaitingChannel ──ChannelOpened────→ Lobby          (+ ListGames)
//!   Lobby           ──GameJoined(Ok)───→ InGame
//! ```
//!
//! There is no way back from `InGame` to `Lobby`: a session is bound to at
//! most one game.
//!
//! Within `InGame` the viewer's placement phase has its own sub-state,
//! `NoSelection ⇄ ShipSelected`. Selecting a ship creates a
//! [`PlacementIntent`]; the intent is cleared when the placement response
//! arrives, whatever it says, and the game is re-fetched once.

use broadside_api::{
    ApiError, LocalRejection, PlaceShip, PlacementIntent, SubmitMove,
};
use broadside_protocol::{
    Coordinate, Game, GameId, GameSummary, Orientation, PushNotification,
    ShipId, SessionId, codes,
};
use broadside_session::Session;

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Which grid a click landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Board {
    /// The viewer's own fleet grid.
    Own,
    /// The opponent's grid (the viewer's attacks).
    Opponent,
}

/// Something the user did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    CreateGame,
    JoinGame(GameId),
    SelectShip {
        ship: ShipId,
        orientation: Orientation,
    },
    ClickCell {
        board: Board,
        at: Coordinate,
    },
}

/// The outcome of a dispatched [`Command`].
#[derive(Debug)]
pub enum Completion {
    GamesListed(Result<Vec<GameSummary>, ApiError>),
    /// Reply to either `CreateGame` or `JoinGame`.
    GameJoined(Result<Game, ApiError>),
    GameFetched(Result<Game, ApiError>),
    ShipPlaced(Result<(), ApiError>),
    MoveSubmitted(Result<(), ApiError>),
}

/// Everything the machine reacts to.
#[derive(Debug)]
pub enum Event {
    SessionResolved(Session),
    ChannelOpened,
    Notification(PushNotification),
    Completed(Completion),
    User(UserAction),
}

// ---------------------------------------------------------------------------
// Effects
// ---------------------------------------------------------------------------

/// A request the driver should send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ListGames,
    CreateGame,
    JoinGame(GameId),
    FetchGame(GameId),
    PlaceShip(PlaceShip),
    SubmitMove(SubmitMove),
}

/// A user-visible notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alert {
    /// The own grid was clicked with no ship selected.
    NoShipSelected,
    /// The opponent grid was clicked out of turn.
    NotYourTurn,
    /// The opponent grid was clicked after the game ended.
    GameOver,
    /// The authority refused a placement.
    BadShipCoords,
}

impl Alert {
    pub fn message(self) -> &'static str {
        match self {
            Self::NoShipSelected => "Select a ship and an orientation first.",
            Self::NotYourTurn => "It is not your turn.",
            Self::GameOver => "The game is over.",
            Self::BadShipCoords => "That ship does not fit there. Try again.",
        }
    }
}

impl std::fmt::Display for Alert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// What the driver must do after an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Open the push channel for this identity.
    OpenChannel(SessionId),
    /// Send a request; its completion comes back as an event.
    Dispatch(Command),
    /// Show a notice to the user.
    Alert(Alert),
}

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

/// The coarse client state, derived from what is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    AwaitingSession,
    AwaitingChannel,
    Lobby,
    InGame,
}

// ---------------------------------------------------------------------------
// Machine
// ---------------------------------------------------------------------------

/// Client state plus the transition function over it.
#[derive(Debug, Default)]
pub struct Machine {
    session: Option<Session>,
    channel_open: bool,
    directory: Option<Vec<GameSummary>>,
    game: Option<Game>,
    intent: Option<PlacementIntent>,
}

impl Machine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn channel_open(&self) -> bool {
        self.channel_open
    }

    /// The last lobby listing, or `None` before the first one arrived.
    pub fn directory(&self) -> Option<&[GameSummary]> {
        self.directory.as_deref()
    }

    pub fn game(&self) -> Option<&Game> {
        self.game.as_ref()
    }

    pub fn intent(&self) -> Option<&PlacementIntent> {
        self.intent.as_ref()
    }

    pub fn mode(&self) -> Mode {
        if self.session.is_none() {
            Mode::AwaitingSession
        } else if !self.channel_open {
            Mode::AwaitingChannel
        } else if self.game.is_none() {
            Mode::Lobby
        } else {
            Mode::InGame
        }
    }

    /// Applies one event and returns the effects to carry out, in order.
    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::SessionResolved(session) => self.on_session(session),
            Event::ChannelOpened => self.on_channel_opened(),
            Event::Notification(note) => self.on_notification(note),
            Event::Completed(completion) => self.on_completion(completion),
            Event::User(action) => self.on_user(action),
        }
    }

    fn on_session(&mut self, session: Session) -> Vec<Effect> {
        if let Some(current) = &self.session {
            tracing::debug!(
                current = %current.id,
                ignored = %session.id,
                "session already resolved"
            );
            return Vec::new();
        }
        tracing::info!(session_id = %session.id, origin = ?session.origin, "session resolved");
        let id = session.id.clone();
        self.session = Some(session);
        vec![Effect::OpenChannel(id)]
    }

    fn on_channel_opened(&mut self) -> Vec<Effect> {
        if self.session.is_none() || self.channel_open {
            tracing::debug!("unexpected channel open ignored");
            return Vec::new();
        }
        tracing::info!("push channel open");
        self.channel_open = true;
        vec![Effect::Dispatch(Command::ListGames)]
    }

    fn on_notification(&mut self, note: PushNotification) -> Vec<Effect> {
        match note {
            PushNotification::RefreshGames => {
                vec![Effect::Dispatch(Command::ListGames)]
            }
            PushNotification::RefreshGame => match &self.game {
                Some(game) => {
                    vec![Effect::Dispatch(Command::FetchGame(game.id.clone()))]
                }
                None => {
                    tracing::debug!("refresh_game ignored, no game joined");
                    Vec::new()
                }
            },
            PushNotification::Unknown => {
                tracing::debug!("unknown push action ignored");
                Vec::new()
            }
        }
    }

    fn on_completion(&mut self, completion: Completion) -> Vec<Effect> {
        match completion {
            Completion::GamesListed(Ok(games)) => {
                tracing::debug!(count = games.len(), "lobby listing replaced");
                self.directory = Some(games);
                Vec::new()
            }
            Completion::GamesListed(Err(e)) => {
                tracing::warn!(error = %e, "listing games failed");
                Vec::new()
            }
            Completion::GameJoined(Ok(game)) => {
                tracing::info!(game_id = %game.id, "game joined");
                self.game = Some(game);
                Vec::new()
            }
            Completion::GameJoined(Err(e)) => {
                tracing::warn!(error = %e, "creating or joining a game failed");
                Vec::new()
            }
            Completion::GameFetched(Ok(game)) => {
                self.game = Some(game);
                Vec::new()
            }
            Completion::GameFetched(Err(e)) => {
                tracing::warn!(error = %e, "fetching game failed");
                Vec::new()
            }
            Completion::ShipPlaced(result) => self.on_ship_placed(result),
            Completion::MoveSubmitted(Ok(())) => self.refetch(),
            Completion::MoveSubmitted(Err(e)) => {
                tracing::warn!(error = %e, "move rejected");
                Vec::new()
            }
        }
    }

    fn on_ship_placed(&mut self, result: Result<(), ApiError>) -> Vec<Effect> {
        self.intent = None;
        let mut effects = Vec::new();
        match result {
            Ok(()) => tracing::debug!("ship placed"),
            Err(e) if e.is_code(codes::BAD_SHIP_COORDS) => {
                tracing::debug!("placement refused by authority");
                effects.push(Effect::Alert(Alert::BadShipCoords));
            }
            Err(e) => tracing::warn!(error = %e, "placing ship failed"),
        }
        effects.extend(self.refetch());
        effects
    }

    fn refetch(&self) -> Vec<Effect> {
        self.game
            .as_ref()
            .map(|game| Effect::Dispatch(Command::FetchGame(game.id.clone())))
            .into_iter()
            .collect()
    }

    fn on_user(&mut self, action: UserAction) -> Vec<Effect> {
        let mode = self.mode();
        match (action, mode) {
            (UserAction::CreateGame, Mode::Lobby) => {
                vec![Effect::Dispatch(Command::CreateGame)]
            }
            (UserAction::JoinGame(id), Mode::Lobby) => {
                vec![Effect::Dispatch(Command::JoinGame(id))]
            }
            (UserAction::SelectShip { ship, orientation }, Mode::InGame) => {
                self.select_ship(ship, orientation);
                Vec::new()
            }
            (UserAction::ClickCell { board: Board::Own, at }, Mode::InGame) => {
                self.click_own(at)
            }
            (
                UserAction::ClickCell {
                    board: Board::Opponent,
                    at,
                },
                Mode::InGame,
            ) => self.click_opponent(at),
            (action, mode) => {
                tracing::debug!(?action, ?mode, "action has no effect in this mode");
                Vec::new()
            }
        }
    }

    fn select_ship(&mut self, ship: ShipId, orientation: Orientation) {
        let Some(game) = &self.game else { return };
        match PlacementIntent::select(game, ship, orientation) {
            Some(intent) => {
                tracing::debug!(ship = %intent.ship(), %orientation, "ship selected");
                self.intent = Some(intent);
            }
            None => tracing::debug!("selection ignored, ship unknown or placed"),
        }
    }

    fn click_own(&mut self, at: Coordinate) -> Vec<Effect> {
        let Some(game) = &self.game else {
            return Vec::new();
        };
        let Some(you) = game.you() else {
            return Vec::new();
        };
        if you.all_ships_added {
            return Vec::new();
        }
        let Some(intent) = &self.intent else {
            return vec![Effect::Alert(Alert::NoShipSelected)];
        };
        match PlaceShip::new(game, intent, at) {
            Ok(request) => vec![Effect::Dispatch(Command::PlaceShip(request))],
            Err(rejection) => {
                tracing::debug!(%rejection, "placement not sent");
                Vec::new()
            }
        }
    }

    fn click_opponent(&mut self, at: Coordinate) -> Vec<Effect> {
        let Some(game) = &self.game else {
            return Vec::new();
        };
        let rendered = game.opponent().is_some_and(|o| o.all_ships_added);
        if !rendered {
            return Vec::new();
        }
        match SubmitMove::new(game, at) {
            Ok(request) => vec![Effect::Dispatch(Command::SubmitMove(request))],
            Err(LocalRejection::NotYourTurn) => {
                vec![Effect::Alert(Alert::NotYourTurn)]
            }
            Err(LocalRejection::GameOver) => vec![Effect::Alert(Alert::GameOver)],
            Err(rejection) => {
                tracing::debug!(%rejection, "move not sent");
                Vec::new()
            }
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use broadside_protocol::PlayerId;
    use broadside_session::SessionOrigin;

    use crate::testing::{game_with_opponent, lone_game, sid};

    fn in_lobby() -> Machine {
        let mut machine = Machine::new();
        machine.handle(Event::SessionResolved(Session {
            id: sid("s1"),
            origin: SessionOrigin::Created,
        }));
        machine.handle(Event::ChannelOpened);
        machine
    }

    fn in_game(game: Game) -> Machine {
        let mut machine = in_lobby();
        machine.handle(Event::Completed(Completion::GameJoined(Ok(game))));
        machine
    }

    fn rejected(code: &str) -> ApiError {
        ApiError::Rejected {
            status: 404,
            code: Some(code.to_string()),
        }
    }

    fn fetch(id: &str) -> Effect {
        Effect::Dispatch(Command::FetchGame(GameId::new(id)))
    }

    fn select(machine: &mut Machine, ship: &str) {
        machine.handle(Event::User(UserAction::SelectShip {
            ship: ShipId::new(ship),
            orientation: Orientation::Horizontal,
        }));
    }

    fn click(board: Board, x: u32, y: u32) -> Event {
        Event::User(UserAction::ClickCell {
            board,
            at: Coordinate::new(x, y),
        })
    }

    // =====================================================================
    // Startup ordering
    // =====================================================================

    #[test]
    fn test_handle_session_resolved_opens_channel() {
        let mut machine = Machine::new();
        assert_eq!(machine.mode(), Mode::AwaitingSession);

        let effects = machine.handle(Event::SessionResolved(Session {
            id: sid("s1"),
            origin: SessionOrigin::Resumed,
        }));

        assert_eq!(effects, vec![Effect::OpenChannel(sid("s1"))]);
        assert_eq!(machine.mode(), Mode::AwaitingChannel);
    }

    #[test]
    fn test_handle_channel_opened_lists_games_once() {
        let mut machine = Machine::new();
        machine.handle(Event::SessionResolved(Session {
            id: sid("s1"),
            origin: SessionOrigin::Created,
        }));

        let effects = machine.handle(Event::ChannelOpened);
        assert_eq!(effects, vec![Effect::Dispatch(Command::ListGames)]);
        assert_eq!(machine.mode(), Mode::Lobby);

        assert!(machine.handle(Event::ChannelOpened).is_empty());
    }

    #[test]
    fn test_handle_channel_opened_before_session_is_ignored() {
        let mut machine = Machine::new();
        assert!(machine.handle(Event::ChannelOpened).is_empty());
        assert_eq!(machine.mode(), Mode::AwaitingSession);
    }

    #[test]
    fn test_handle_second_session_is_ignored() {
        let mut machine = in_lobby();
        let effects = machine.handle(Event::SessionResolved(Session {
            id: sid("other"),
            origin: SessionOrigin::Created,
        }));
        assert!(effects.is_empty());
        assert_eq!(machine.session().unwrap().id, sid("s1"));
    }

    #[test]
    fn test_handle_create_while_awaiting_session_has_no_effect() {
        let mut machine = Machine::new();
        let effects = machine.handle(Event::User(UserAction::CreateGame));
        assert!(effects.is_empty());
    }

    // =====================================================================
    // Lobby
    // =====================================================================

    #[test]
    fn test_handle_listing_replaces_directory_wholesale() {
        let mut machine = in_lobby();
        let listing = |ids: &[&str]| {
            ids.iter()
                .map(|id| GameSummary { id: GameId::new(*id) })
                .collect::<Vec<_>>()
        };

        machine.handle(Event::Completed(Completion::GamesListed(Ok(listing(&["a", "b"])))));
        machine.handle(Event::Completed(Completion::GamesListed(Ok(listing(&["c"])))));

        assert_eq!(machine.directory().unwrap(), listing(&["c"]).as_slice());
    }

    #[test]
    fn test_handle_failed_listing_keeps_previous_directory() {
        let mut machine = in_lobby();
        machine.handle(Event::Completed(Completion::GamesListed(Ok(vec![]))));
        machine.handle(Event::Completed(Completion::GamesListed(Err(rejected("x")))));
        assert_eq!(machine.directory(), Some(&[][..]));
    }

    #[test]
    fn test_handle_join_dispatches_in_lobby() {
        let mut machine = in_lobby();
        let effects = machine.handle(Event::User(UserAction::JoinGame(GameId::new("g7"))));
        assert_eq!(
            effects,
            vec![Effect::Dispatch(Command::JoinGame(GameId::new("g7")))]
        );
    }

    #[test]
    fn test_handle_failed_create_stays_in_lobby() {
        let mut machine = in_lobby();
        machine.handle(Event::Completed(Completion::GameJoined(Err(rejected(
            codes::NO_SESSION_ID,
        )))));
        assert_eq!(machine.mode(), Mode::Lobby);
    }

    #[test]
    fn test_handle_create_while_in_game_has_no_effect() {
        let mut machine = in_game(lone_game());
        assert!(machine.handle(Event::User(UserAction::CreateGame)).is_empty());
    }

    // =====================================================================
    // Push notifications
    // =====================================================================

    #[test]
    fn test_handle_refresh_games_always_lists() {
        let mut lobby = in_lobby();
        let mut game = in_game(lone_game());
        for machine in [&mut lobby, &mut game] {
            let effects = machine.handle(Event::Notification(PushNotification::RefreshGames));
            assert_eq!(effects, vec![Effect::Dispatch(Command::ListGames)]);
        }
    }

    #[test]
    fn test_handle_refresh_game_without_game_is_ignored() {
        let mut machine = in_lobby();
        let effects = machine.handle(Event::Notification(PushNotification::RefreshGame));
        assert!(effects.is_empty());
    }

    #[test]
    fn test_handle_refresh_game_with_game_fetches() {
        let mut machine = in_game(lone_game());
        let effects = machine.handle(Event::Notification(PushNotification::RefreshGame));
        assert_eq!(effects, vec![fetch("g1")]);
    }

    #[test]
    fn test_handle_unknown_notification_is_ignored() {
        let mut machine = in_game(lone_game());
        assert!(machine
            .handle(Event::Notification(PushNotification::Unknown))
            .is_empty());
    }

    // =====================================================================
    // Placement
    // =====================================================================

    #[test]
    fn test_handle_select_then_click_dispatches_placement() {
        let mut machine = in_game(lone_game());
        select(&mut machine, "cruiser");

        let effects = machine.handle(click(Board::Own, 2, 4));

        let [Effect::Dispatch(Command::PlaceShip(request))] = effects.as_slice() else {
            panic!("expected one placement, got {effects:?}");
        };
        assert_eq!(request.ship, ShipId::new("cruiser"));
        assert_eq!(request.at, Coordinate::new(2, 4));
        assert_eq!(request.orientation, Orientation::Horizontal);
        assert!(machine.intent().is_some(), "intent lives until the reply");
    }

    #[test]
    fn test_handle_reselect_replaces_intent() {
        let mut machine = in_game(lone_game());
        select(&mut machine, "cruiser");
        machine.handle(Event::User(UserAction::SelectShip {
            ship: ShipId::new("destroyer"),
            orientation: Orientation::Vertical,
        }));

        let intent = machine.intent().unwrap();
        assert_eq!(intent.ship(), &ShipId::new("destroyer"));
        assert_eq!(intent.orientation(), Orientation::Vertical);
    }

    #[test]
    fn test_handle_select_unknown_ship_keeps_no_selection() {
        let mut machine = in_game(lone_game());
        select(&mut machine, "rowboat");
        assert!(machine.intent().is_none());
    }

    #[test]
    fn test_handle_own_click_without_selection_alerts() {
        let mut machine = in_game(lone_game());
        let effects = machine.handle(click(Board::Own, 0, 0));
        assert_eq!(effects, vec![Effect::Alert(Alert::NoShipSelected)]);
    }

    #[test]
    fn test_handle_own_click_after_all_ships_added_has_no_effect() {
        let mut game = lone_game();
        game.players.get_mut(&PlayerId::new("p1")).unwrap().all_ships_added = true;
        let mut machine = in_game(game);

        assert!(machine.handle(click(Board::Own, 0, 0)).is_empty());
    }

    #[test]
    fn test_handle_placement_success_clears_intent_and_fetches_once() {
        let mut machine = in_game(lone_game());
        select(&mut machine, "cruiser");
        machine.handle(click(Board::Own, 1, 1));

        let effects = machine.handle(Event::Completed(Completion::ShipPlaced(Ok(()))));

        assert_eq!(effects, vec![fetch("g1")]);
        assert!(machine.intent().is_none());
    }

    #[test]
    fn test_handle_placement_transport_failure_clears_intent_and_fetches_once() {
        let mut machine = in_game(lone_game());
        select(&mut machine, "cruiser");

        let effects = machine.handle(Event::Completed(Completion::ShipPlaced(Err(
            ApiError::Rejected {
                status: 500,
                code: None,
            },
        ))));

        assert_eq!(effects, vec![fetch("g1")]);
        assert!(machine.intent().is_none());
    }

    #[test]
    fn test_handle_placement_bad_ship_coords_alerts_clears_intent_and_fetches_once() {
        let mut machine = in_game(lone_game());
        select(&mut machine, "cruiser");
        machine.handle(click(Board::Own, 9, 9));

        let effects = machine.handle(Event::Completed(Completion::ShipPlaced(Err(
            rejected(codes::BAD_SHIP_COORDS),
        ))));

        assert_eq!(
            effects,
            vec![Effect::Alert(Alert::BadShipCoords), fetch("g1")]
        );
        assert!(machine.intent().is_none());
    }

    // =====================================================================
    // Attacks
    // =====================================================================

    #[test]
    fn test_handle_opponent_click_out_of_turn_alerts_without_dispatch() {
        let mut machine = in_game(game_with_opponent(false, true));

        let effects = machine.handle(click(Board::Opponent, 3, 3));

        assert_eq!(effects, vec![Effect::Alert(Alert::NotYourTurn)]);
    }

    #[test]
    fn test_handle_opponent_click_on_turn_dispatches_move() {
        let mut machine = in_game(game_with_opponent(true, true));

        let effects = machine.handle(click(Board::Opponent, 3, 5));

        let [Effect::Dispatch(Command::SubmitMove(request))] = effects.as_slice() else {
            panic!("expected one move, got {effects:?}");
        };
        assert_eq!(request.at, Coordinate::new(3, 5));
    }

    #[test]
    fn test_handle_opponent_click_before_opponent_ready_has_no_effect() {
        let mut machine = in_game(game_with_opponent(true, false));
        assert!(machine.handle(click(Board::Opponent, 0, 0)).is_empty());
    }

    #[test]
    fn test_handle_opponent_click_after_game_over_alerts() {
        let mut game = game_with_opponent(true, true);
        game.game_status = Some(false);
        let mut machine = in_game(game);

        let effects = machine.handle(click(Board::Opponent, 0, 0));
        assert_eq!(effects, vec![Effect::Alert(Alert::GameOver)]);
    }

    #[test]
    fn test_handle_move_success_fetches_and_failure_does_not() {
        let mut machine = in_game(game_with_opponent(true, true));

        let ok = machine.handle(Event::Completed(Completion::MoveSubmitted(Ok(()))));
        assert_eq!(ok, vec![fetch("g1")]);

        let failed = machine.handle(Event::Completed(Completion::MoveSubmitted(Err(
            rejected(codes::NOT_YOUR_TURN),
        ))));
        assert!(failed.is_empty());
    }

    #[test]
    fn test_handle_fetched_game_replaces_cache_wholesale() {
        let mut machine = in_game(lone_game());
        let joined = game_with_opponent(true, true);

        machine.handle(Event::Completed(Completion::GameFetched(Ok(joined.clone()))));

        assert_eq!(machine.game(), Some(&joined));
    }

    #[test]
    fn test_handle_failed_fetch_keeps_cached_game() {
        let mut machine = in_game(lone_game());
        machine.handle(Event::Completed(Completion::GameFetched(Err(rejected(
            codes::GAME_NOT_FOUND,
        )))));
        assert_eq!(machine.game(), Some(&lone_game()));
    }
}
