//! Request/response surface of the Broadside game authority.
//!
//! - **Endpoints** ([`Endpoint`], [`PlaceShip`], [`SubmitMove`]): what can
//!   be asked, with local precondition checks on the state-changing calls.
//! - **Seam** ([`GameApi`], [`HttpApi`]): how a call reaches the authority.
//! - **Clients** ([`DirectoryClient`], [`GameClient`]): typed results for
//!   the lobby and for one game.
//! - **Identity** ([`ApiSessionIssuer`]): the session layer's issuer over
//!   this surface.
//!
//! ```text
//! Client core  → DirectoryClient / GameClient → GameApi → HTTP
//! Session boot → ApiSessionIssuer ─────────────┘
//! ```

#![allow(async_fn_in_trait)]

mod client;
mod config;
mod endpoint;
mod error;
mod http;
mod issuer;

pub use client::{DirectoryClient, GameClient, interpret};
pub use config::ApiConfig;
pub use endpoint::{
    Endpoint, LocalRejection, Method, PlaceShip, PlacementIntent, SubmitMove,
};
pub use error::ApiError;
pub use http::{GameApi, HttpApi, RawReply};
pub use issuer::ApiSessionIssuer;
