//! The client driver: one task that feeds events to the [`Machine`] and
//! carries out the effects it returns.
//!
//! ```text
//!  ClientHandle ──UserAction──┐
//!  bootstrap task ──┐         ▼
//!  push task ───────┼──→ [driver loop] ──→ Machine::handle ──→ effects
//!  request tasks ───┘         │                                  │
//!         ▲                   ├──→ watch<View>   (latest view)    │
//!         └───────────────────┴──→ mpsc<Alert>   (every alert) ◄─┘
//! ```
//!
//! The loop is the only place state changes, so every published view is
//! built from a complete snapshot. Network work never runs on the loop: each
//! request is a spawned task that posts its completion back as an event.
//! The loop stops once every [`ClientHandle`] is dropped.

use std::sync::Arc;

use broadside_api::{
    ApiSessionIssuer, DirectoryClient, GameApi, GameClient, HttpApi,
};
use broadside_protocol::{
    Codec, Coordinate, GameId, JsonCodec, Orientation, PushNotification,
    ShipId,
};
use broadside_session::{FileSessionStore, SessionBootstrapper, SessionStore};
use broadside_transport::{PushConnection, WebSocketPushConnection, push_url};
use tokio::sync::{mpsc, watch};

use crate::{
    Alert, Board, BroadsideError, ClientConfig, Command, Completion, Effect,
    Event, Machine, UserAction, View, project,
};

// ---------------------------------------------------------------------------
// Handles
// ---------------------------------------------------------------------------

/// Sends user actions to a running client.
///
/// Cheap to clone. The driver stops when the last handle is dropped.
#[derive(Debug, Clone)]
pub struct ClientHandle {
    actions: mpsc::Sender<UserAction>,
}

impl ClientHandle {
    /// Queues a user action.
    ///
    /// # Errors
    /// [`BroadsideError::ClientStopped`] if the driver is gone.
    pub async fn send(&self, action: UserAction) -> Result<(), BroadsideError> {
        self.actions
            .send(action)
            .await
            .map_err(|_| BroadsideError::ClientStopped)
    }

    pub async fn create_game(&self) -> Result<(), BroadsideError> {
        self.send(UserAction::CreateGame).await
    }

    pub async fn join_game(&self, game: GameId) -> Result<(), BroadsideError> {
        self.send(UserAction::JoinGame(game)).await
    }

    pub async fn select_ship(
        &self,
        ship: ShipId,
        orientation: Orientation,
    ) -> Result<(), BroadsideError> {
        self.send(UserAction::SelectShip { ship, orientation }).await
    }

    pub async fn click_cell(
        &self,
        board: Board,
        at: Coordinate,
    ) -> Result<(), BroadsideError> {
        self.send(UserAction::ClickCell { board, at }).await
    }
}

/// A running client: the action handle plus its outputs.
pub struct Client {
    pub handle: ClientHandle,
    /// Latest projected view. Intermediate views may be skipped.
    pub views: watch::Receiver<View>,
    /// Every alert, in order.
    pub alerts: mpsc::UnboundedReceiver<Alert>,
}

// ---------------------------------------------------------------------------
// Startup
// ---------------------------------------------------------------------------

/// Starts a client against the real authority: HTTP requests and a
/// file-backed session store, both taken from `config`.
///
/// Must be called within a Tokio runtime.
///
/// # Errors
/// Returns [`BroadsideError::Api`] if the HTTP client cannot be built.
pub fn spawn_http(config: &ClientConfig) -> Result<Client, BroadsideError> {
    let api = Arc::new(HttpApi::new(&config.api_config())?);
    let store = FileSessionStore::new(&config.storage_dir, &config.session);
    Ok(spawn(api, store, config))
}

/// Starts a client over any [`GameApi`] and [`SessionStore`].
///
/// Session bootstrap begins immediately in the background; until it
/// resolves and the push channel opens, the published view is
/// [`View::Loading`].
///
/// Must be called within a Tokio runtime.
pub fn spawn<A: GameApi, S: SessionStore>(
    api: Arc<A>,
    store: S,
    config: &ClientConfig,
) -> Client {
    let capacity = config.event_channel_capacity.max(1);
    let (actions_tx, actions_rx) = mpsc::channel(capacity);
    let (events_tx, events_rx) = mpsc::channel(capacity);
    let (views_tx, views_rx) = watch::channel(View::Loading);
    let (alerts_tx, alerts_rx) = mpsc::unbounded_channel();

    let bootstrapper = SessionBootstrapper::new(
        ApiSessionIssuer::new(Arc::clone(&api)),
        store,
        config.session.clone(),
    );
    let bootstrap_tx = events_tx.clone();
    tokio::spawn(async move {
        match bootstrapper.resolve().await {
            Ok(session) => {
                let _ = bootstrap_tx.send(Event::SessionResolved(session)).await;
            }
            Err(e) => {
                tracing::error!(error = %e, "session bootstrap failed, client stays loading");
            }
        }
    });

    let driver = Driver {
        machine: Machine::new(),
        api,
        push_base: config.push_base(),
        actions: actions_rx,
        events: events_rx,
        events_tx,
        views: views_tx,
        alerts: alerts_tx,
    };
    tokio::spawn(driver.run());

    Client {
        handle: ClientHandle {
            actions: actions_tx,
        },
        views: views_rx,
        alerts: alerts_rx,
    }
}

// ---------------------------------------------------------------------------
// Driver loop
// ---------------------------------------------------------------------------

struct Driver<A> {
    machine: Machine,
    api: Arc<A>,
    push_base: String,
    actions: mpsc::Receiver<UserAction>,
    events: mpsc::Receiver<Event>,
    /// Cloned into every spawned task so completions come back here.
    events_tx: mpsc::Sender<Event>,
    views: watch::Sender<View>,
    alerts: mpsc::UnboundedSender<Alert>,
}

impl<A: GameApi> Driver<A> {
    async fn run(mut self) {
        tracing::info!("client driver started");

        loop {
            let event = tokio::select! {
                action = self.actions.recv() => match action {
                    Some(action) => Event::User(action),
                    None => break,
                },
                Some(event) = self.events.recv() => event,
            };

            for effect in self.machine.handle(event) {
                self.execute(effect);
            }
            self.publish();
        }

        tracing::info!("client driver stopped");
    }

    fn execute(&self, effect: Effect) {
        match effect {
            Effect::OpenChannel(session) => {
                let url = push_url(&self.push_base, session.as_str());
                tokio::spawn(run_push_channel(url, self.events_tx.clone()));
            }
            Effect::Dispatch(command) => self.dispatch(command),
            Effect::Alert(alert) => {
                tracing::debug!(%alert, "alert raised");
                let _ = self.alerts.send(alert);
            }
        }
    }

    fn dispatch(&self, command: Command) {
        let Some(session) = self.machine.session() else {
            tracing::warn!(?command, "no session, command dropped");
            return;
        };
        let directory = DirectoryClient::new(Arc::clone(&self.api), session.id.clone());
        let games = GameClient::new(Arc::clone(&self.api), session.id.clone());
        let tx = self.events_tx.clone();

        tokio::spawn(async move {
            let completion = match command {
                Command::ListGames => Completion::GamesListed(directory.list_games().await),
                Command::CreateGame => Completion::GameJoined(directory.create_game().await),
                Command::JoinGame(game) => {
                    Completion::GameJoined(directory.join_game(&game).await)
                }
                Command::FetchGame(game) => {
                    Completion::GameFetched(games.fetch_game(&game).await)
                }
                Command::PlaceShip(request) => {
                    Completion::ShipPlaced(games.place_ship(request).await)
                }
                Command::SubmitMove(request) => {
                    Completion::MoveSubmitted(games.submit_move(request).await)
                }
            };
            let _ = tx.send(Event::Completed(completion)).await;
        });
    }

    fn publish(&self) {
        let next = project(&self.machine);
        self.views.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }
}

// ---------------------------------------------------------------------------
// Push channel
// ---------------------------------------------------------------------------

/// Connects the push channel and forwards notifications until either side
/// goes away. No reconnect is attempted.
async fn run_push_channel(url: String, events: mpsc::Sender<Event>) {
    let mut conn = match WebSocketPushConnection::connect(&url).await {
        Ok(conn) => conn,
        Err(e) => {
            tracing::error!(%url, error = %e, "push channel failed to open");
            return;
        }
    };
    if events.send(Event::ChannelOpened).await.is_err() {
        return;
    }

    loop {
        let frame = tokio::select! {
            frame = conn.recv() => frame,
            () = events.closed() => break,
        };
        match frame {
            Ok(Some(data)) => match JsonCodec.decode::<PushNotification>(&data) {
                Ok(note) => {
                    if events.send(Event::Notification(note)).await.is_err() {
                        break;
                    }
                }
                Err(e) => tracing::debug!(error = %e, "malformed push frame ignored"),
            },
            Ok(None) => {
                tracing::warn!(%url, "push channel closed by authority");
                return;
            }
            Err(e) => {
                tracing::warn!(%url, error = %e, "push channel failed");
                return;
            }
        }
    }

    let _ = conn.close().await;
}
