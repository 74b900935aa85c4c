//! Logged-in flag with explicit accessors

use super::store::{KeyValueStore, MemoryStore};
use crate::error::Result;
use std::sync::Arc;
use tracing::{debug, warn};

/// Key the flag is stored under
pub const SESSION_KEY: &str = "isLoggedIn";

/// Value stored while logged in
pub const LOGGED_IN_VALUE: &str = "yes";

/// Process-wide "logged in" hint
///
/// Cloning is cheap and every clone observes the same store. Only
/// [`Authenticator`](crate::auth::Authenticator) writes to it: login sets the
/// flag, logout and a failed token refresh clear it.
#[derive(Debug, Clone)]
pub struct SessionState {
    store: Arc<dyn KeyValueStore>,
}

impl SessionState {
    /// Create a session backed by the given store
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Create a session that lives only as long as the process
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Whether the user is believed to be logged in
    ///
    /// A store that cannot be read counts as logged out.
    pub async fn is_logged_in(&self) -> bool {
        match self.store.get(SESSION_KEY).await {
            Ok(value) => value.is_some(),
            Err(e) => {
                warn!("Failed to read session flag: {e}");
                false
            }
        }
    }

    /// Record a successful login
    pub async fn set_logged_in(&self) -> Result<()> {
        debug!("Session flag set");
        self.store.set(SESSION_KEY, LOGGED_IN_VALUE).await
    }

    /// Forget the login
    pub async fn clear(&self) -> Result<()> {
        debug!("Session flag cleared");
        self.store.remove(SESSION_KEY).await
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::in_memory()
    }
}
