//! Persisted storage for the session identity.
//!
//! The identity outlives the process so a restarted client can resume the
//! same seat in a game. Storage holds a single value under a single key.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use broadside_protocol::SessionId;

use crate::{SessionConfig, SessionError};

/// Loads and saves the one persisted session identity.
pub trait SessionStore: Send + Sync + 'static {
    /// Returns the stored identity, or `None` if nothing is stored.
    fn load(&self) -> Result<Option<SessionId>, SessionError>;

    /// Stores `id`, replacing any previous value.
    fn save(&self, id: &SessionId) -> Result<(), SessionError>;
}

// ---------------------------------------------------------------------------
// FileSessionStore
// ---------------------------------------------------------------------------

/// Keeps the identity in a file named after the storage key.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Stores the identity at `<dir>/<config.storage_key>`.
    pub fn new(dir: impl AsRef<Path>, config: &SessionConfig) -> Self {
        Self {
            path: dir.as_ref().join(&config.storage_key),
        }
    }

    /// The file the identity is kept in.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<SessionId>, SessionError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let id = contents.trim();
                if id.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(SessionId::new(id)))
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SessionError::Storage(e)),
        }
    }

    fn save(&self, id: &SessionId) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(SessionError::Storage)?;
        }
        std::fs::write(&self.path, id.as_str()).map_err(SessionError::Storage)?;
        tracing::debug!(path = %self.path.display(), "session identity persisted");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MemorySessionStore
// ---------------------------------------------------------------------------

/// Keeps the identity in memory. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<SessionId>>,
}

impl MemorySessionStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `id`, as if a previous run saved it.
    pub fn with_identity(id: SessionId) -> Self {
        Self {
            slot: Mutex::new(Some(id)),
        }
    }

    /// Returns the currently stored identity.
    pub fn current(&self) -> Option<SessionId> {
        self.slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<SessionId>, SessionError> {
        Ok(self.current())
    }

    fn save(&self, id: &SessionId) -> Result<(), SessionError> {
        *self
            .slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(id.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A per-test scratch directory under the system temp dir.
    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "broadside-session-{name}-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_file_store_load_missing_returns_none() {
        let store =
            FileSessionStore::new(scratch_dir("missing"), &SessionConfig::default());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_file_store_save_then_load_returns_identity() {
        let dir = scratch_dir("save");
        let store = FileSessionStore::new(&dir, &SessionConfig::default());

        store.save(&SessionId::new("abc-123")).unwrap();

        assert_eq!(store.path(), dir.join(crate::DEFAULT_STORAGE_KEY));
        assert_eq!(store.load().unwrap(), Some(SessionId::new("abc-123")));
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_file_store_uses_configured_key() {
        let dir = scratch_dir("key");
        let config = SessionConfig::default().with_storage_key("other-key");
        let store = FileSessionStore::new(&dir, &config);

        store.save(&SessionId::new("s1")).unwrap();

        assert!(dir.join("other-key").exists());
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_file_store_blank_file_counts_as_absent() {
        let dir = scratch_dir("blank");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(crate::DEFAULT_STORAGE_KEY), "  \n").unwrap();

        let store = FileSessionStore::new(&dir, &SessionConfig::default());
        assert!(store.load().unwrap().is_none());
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_memory_store_save_replaces_value() {
        let store = MemorySessionStore::with_identity(SessionId::new("old"));
        store.save(&SessionId::new("new")).unwrap();
        assert_eq!(store.load().unwrap(), Some(SessionId::new("new")));
    }
}
