use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::UserProfile;
use crate::storage::{Storage, StorageError, TOKEN_KEY, USER_KEY};

/// An authenticated session. Profile and token always travel together.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: UserProfile,
    pub token: String,
}

// Keep the token out of logs
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl Session {
    pub fn new(user: UserProfile, token: impl Into<String>) -> Self {
        Self {
            user,
            token: token.into(),
        }
    }
}

/// Reads and writes the session through durable storage.
#[derive(Clone)]
pub struct SessionPersistence {
    storage: Arc<dyn Storage>,
}

impl SessionPersistence {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Load the persisted session.
    ///
    /// Returns `Ok(None)` when either key is missing. A profile that fails to
    /// parse is discarded together with its token.
    pub fn load(&self) -> Result<Option<Session>, StorageError> {
        let user = self.storage.get_item(USER_KEY)?;
        let token = self.storage.get_item(TOKEN_KEY)?;

        let (Some(user), Some(token)) = (user, token) else {
            return Ok(None);
        };
        if token.is_empty() {
            return Ok(None);
        }

        match serde_json::from_str::<UserProfile>(&user) {
            Ok(user) => Ok(Some(Session { user, token })),
            Err(e) => {
                warn!(error = %e, "Discarding corrupt persisted session");
                self.clear()?;
                Ok(None)
            }
        }
    }

    pub fn save(&self, session: &Session) -> Result<(), StorageError> {
        let user = serde_json::to_string(&session.user)?;
        self.storage.set_item(USER_KEY, &user)?;
        self.storage.set_item(TOKEN_KEY, &session.token)?;
        Ok(())
    }

    /// Remove both session keys. Removing absent keys is not an error.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove_item(USER_KEY)?;
        self.storage.remove_item(TOKEN_KEY)?;
        Ok(())
    }
}
