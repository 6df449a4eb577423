//! Session bootstrap: resume a stored identity or create a new one.
//!
//! ```text
//!   store.load() ──Some(id)──→ issuer.resume(id) ──Ok──→ [Resumed]
//!        │                          │
//!       None                       Err (expired, unknown, network)
//!        │                          │
//!        └────────→ issuer.create() ←┘ ──Ok──→ store.save() → [Created]
//! ```
//!
//! Exactly one identity comes out of a successful bootstrap. Storage
//! problems never block it: an unreadable store counts as empty, and a
//! failed save only means the next run creates a new identity.

use broadside_protocol::SessionId;

use crate::{
    Session, SessionConfig, SessionError, SessionIssuer, SessionOrigin,
    SessionStore,
};

/// Resolves the process-wide session identity at startup.
pub struct SessionBootstrapper<I, S> {
    issuer: I,
    store: S,
    config: SessionConfig,
}

impl<I: SessionIssuer, S: SessionStore> SessionBootstrapper<I, S> {
    /// Creates a bootstrapper over the given issuer and store.
    pub fn new(issuer: I, store: S, config: SessionConfig) -> Self {
        Self {
            issuer,
            store,
            config,
        }
    }

    /// Returns the persisted-storage backend.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Resolves the session identity.
    ///
    /// # Errors
    /// Returns the issuer's error if creating a new identity fails. A
    /// failed *resume* is not an error; it falls back to creation.
    pub async fn resolve(&self) -> Result<Session, SessionError> {
        if let Some(stored) = self.stored_identity() {
            match self.issuer.resume(&stored).await {
                Ok(id) if id == stored => {
                    tracing::info!(session_id = %id, "session resumed");
                    return Ok(Session {
                        id,
                        origin: SessionOrigin::Resumed,
                    });
                }
                Ok(id) => {
                    // The authority forgot the stored identity and issued
                    // a replacement in the same response.
                    tracing::info!(
                        stored = %stored,
                        session_id = %id,
                        "stored session replaced by authority"
                    );
                    self.persist(&id);
                    return Ok(Session {
                        id,
                        origin: SessionOrigin::Created,
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        stored = %stored,
                        error = %e,
                        "session resume failed, creating a new session"
                    );
                }
            }
        }

        let id = self.issuer.create().await?;
        tracing::info!(session_id = %id, "session created");
        self.persist(&id);
        Ok(Session {
            id,
            origin: SessionOrigin::Created,
        })
    }

    /// Reads the stored identity, treating storage failures as "nothing
    /// stored".
    fn stored_identity(&self) -> Option<SessionId> {
        if !self.config.resume {
            return None;
        }
        match self.store.load() {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(error = %e, "could not read stored session");
                None
            }
        }
    }

    fn persist(&self, id: &SessionId) {
        if let Err(e) = self.store.save(id) {
            tracing::warn!(
                session_id = %id,
                error = %e,
                "could not persist session identity"
            );
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
