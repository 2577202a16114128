//! Session Store
//!
//! Pure data access over a persisted storage scope. Every outbound request
//! reads the session through [`SessionStore::get`]; nothing else touches the
//! storage directly.

use crate::error::CoreError;
use crate::models::Session;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, warn};

/// Storage scope that outlives the process (localStorage, a file, ...)
pub trait SessionStorage: Send + Sync {
    fn load(&self) -> Option<String>;
    fn store(&self, raw: &str) -> Result<(), CoreError>;
    fn remove(&self);
}

/// In-memory storage, counting writes so tests can assert on them
#[derive(Debug, Default)]
pub struct MemoryStorage {
    value: Mutex<Option<String>>,
    removals: Mutex<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            value: Mutex::new(Some(raw.into())),
            removals: Mutex::new(0),
        }
    }

    /// How many times `remove` actually deleted a stored value
    pub fn removals(&self) -> usize {
        *self.removals.lock()
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self) -> Option<String> {
        self.value.lock().clone()
    }

    fn store(&self, raw: &str) -> Result<(), CoreError> {
        *self.value.lock() = Some(raw.to_string());
        Ok(())
    }

    fn remove(&self) {
        if self.value.lock().take().is_some() {
            *self.removals.lock() += 1;
        }
    }
}

/// Accessor for the single live session of this context
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self { storage }
    }

    /// Current session, or `None` when logged out.
    ///
    /// A corrupt stored value reads as logged out.
    pub fn get(&self) -> Option<Session> {
        let raw = self.storage.load()?;
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!(error = %e, "Stored session is unreadable, treating as logged out");
                None
            }
        }
    }

    /// Replace the session (last write wins)
    pub fn set(&self, session: &Session) -> Result<(), CoreError> {
        let raw = serde_json::to_string(session).map_err(|e| CoreError::SessionSerialization {
            message: e.to_string(),
        })?;
        self.storage.store(&raw)?;
        debug!(user = %session.identity.username, company = %session.company_id, "Session stored");
        Ok(())
    }

    /// Remove the session; returns whether one was present
    pub fn clear(&self) -> bool {
        let present = self.storage.load().is_some();
        if present {
            self.storage.remove();
            debug!("Session cleared");
        }
        present
    }

    /// True iff a session is present. Expiry is only discovered when a
    /// request comes back with an authentication failure.
    pub fn is_valid(&self) -> bool {
        self.get().is_some()
    }

    /// `Authorization` header for outbound requests, if the session carries one
    pub fn authorization_header(&self) -> Option<String> {
        self.get().and_then(|s| s.authorization_header())
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("present", &self.storage.load().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Credentials, Identity};

    fn session() -> Session {
        Session::new(
            "ACME",
            Identity {
                username: "ada".to_string(),
                email: "ada@example.com".to_string(),
                full_name: "Ada Lovelace".to_string(),
            },
            Credentials::ApiKey {
                key: "k".to_string(),
                secret: "s".to_string(),
            },
        )
    }

    #[test]
    fn test_set_get_clear() {
        let storage = Arc::new(MemoryStorage::new());
        let store = SessionStore::new(storage.clone());
        assert!(!store.is_valid());

        store.set(&session()).unwrap();
        assert!(store.is_valid());
        assert_eq!(store.get().unwrap().company_id, "ACME");
        assert_eq!(store.authorization_header().as_deref(), Some("token k:s"));

        assert!(store.clear());
        assert!(!store.is_valid());
        assert!(!store.clear());
        assert_eq!(storage.removals(), 1);
    }

    #[test]
    fn test_corrupt_session_reads_as_logged_out() {
        let store = SessionStore::new(Arc::new(MemoryStorage::with_raw("{not json")));
        assert!(store.get().is_none());
        assert!(!store.is_valid());
    }

    #[test]
    fn test_last_write_wins() {
        let store = SessionStore::new(Arc::new(MemoryStorage::new()));
        store.set(&session()).unwrap();

        let mut other = session();
        other.company_id = "GLOBEX".to_string();
        store.set(&other).unwrap();

        assert_eq!(store.get().unwrap().company_id, "GLOBEX");
    }
}
