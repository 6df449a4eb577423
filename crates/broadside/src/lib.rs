//! # Broadside
//!
//! Client-side game-state synchronization and interaction state machine
//! for a two-player naval combat game.
//!
//! The client bootstraps a session identity, opens a push channel keyed by
//! it, lists open games, and lets the user create or join one. From then on
//! every push notification and every successful mutation triggers a fresh
//! fetch of the authoritative game state, and a pure projection turns that
//! state into a renderable [`View`].
//!
//! ## Layers
//!
//! ```text
//! broadside            Machine (events → effects), View projection, driver
//! broadside-api        Endpoints, GameApi seam, HttpApi, typed clients
//! broadside-session    Session bootstrap and persistence
//! broadside-transport  Push channel (WebSocket)
//! broadside-protocol   Wire types and codecs
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use broadside::prelude::*;
//!
//! # async fn run() -> Result<(), BroadsideError> {
//! let mut client = broadside::spawn_http(&ClientConfig::from_env())?;
//! while client.views.changed().await.is_ok() {
//!     if let View::Lobby(Listing::Empty) = &*client.views.borrow() {
//!         break;
//!     }
//! }
//! client.handle.create_game().await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod driver;
mod error;
mod machine;
#[cfg(test)]
mod testing;
mod view;

pub use config::{ClientConfig, HOST_ENV, STATE_DIR_ENV};
pub use driver::{Client, ClientHandle, spawn, spawn_http};
pub use error::BroadsideError;
pub use machine::{
    Alert, Board, Command, Completion, Effect, Event, Machine, Mode,
    UserAction,
};
pub use view::{
    Banner, BoardView, CellClass, CellView, FleetEntry, FleetStatus,
    GameView, Listing, NO_GAMES, OpponentBoard, OpponentHeader, View,
    WAITING_FOR_PLAYER, project, resolve_ship,
};

/// Re-exports of the layer crates' most used items.
pub mod prelude {
    pub use crate::{
        Alert, Banner, Board, BroadsideError, Client, ClientConfig,
        ClientHandle, Listing, OpponentBoard, OpponentHeader, UserAction,
        View,
    };
    pub use broadside_api::{ApiConfig, GameApi, HttpApi};
    pub use broadside_protocol::{
        Coordinate, GameId, Orientation, PlayerId, SessionId, ShipId,
    };
    pub use broadside_session::{
        FileSessionStore, MemorySessionStore, SessionConfig,
    };
}
