//! Session identity management for the Broadside client.
//!
//! Every request the client makes (other than obtaining the identity
//! itself) is authenticated by one opaque session identity. This crate
//! covers how that identity comes to exist:
//!
//! 1. **Persistence**: remembering the identity across restarts
//!    ([`SessionStore`], [`FileSessionStore`], [`MemorySessionStore`])
//! 2. **Issuing**: asking the authority for a new identity or to resume a
//!    stored one ([`SessionIssuer`] trait)
//! 3. **Bootstrap**: resume-or-create on startup ([`SessionBootstrapper`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Client core (above)  ← waits for the resolved Session before anything else
//!     ↕
//! Session Layer (this crate)  ← resolves and persists the identity
//!     ↕
//! Protocol Layer (below)  ← provides SessionId
//! ```

mod bootstrap;
mod error;
mod issuer;
mod session;
mod store;

pub use bootstrap::SessionBootstrapper;
pub use error::SessionError;
pub use issuer::SessionIssuer;
pub use session::{DEFAULT_STORAGE_KEY, Session, SessionConfig, SessionOrigin};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore};
