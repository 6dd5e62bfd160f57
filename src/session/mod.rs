use std::path::{Path, PathBuf};
use std::sync::RwLock;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Durable session state, shaped `{"state":{"token":...}}` so the file stays
/// compatible with what the admin console has always persisted.
#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedSession {
    state: PersistedState,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedState {
    token: Option<String>,
}

/// Holds the admin bearer token for the lifetime of the process and mirrors
/// every transition to disk, so a restart resumes the session without any
/// asynchronous hydration step.
///
/// `is_authenticated` is a plain synchronous predicate; the route guard relies
/// on that.
pub struct SessionStore {
    token: RwLock<Option<String>>,
    store_path: PathBuf,
}

impl SessionStore {
    /// Restores the session from `store_path`. A missing or unreadable file
    /// yields an unauthenticated store rather than a startup failure.
    pub fn load(store_path: impl AsRef<Path>) -> Self {
        let store_path = store_path.as_ref().to_path_buf();
        let token = match std::fs::read_to_string(&store_path) {
            Ok(raw) => match serde_json::from_str::<PersistedSession>(&raw) {
                Ok(persisted) => persisted.state.token,
                Err(err) => {
                    warn!(
                        path = %store_path.display(),
                        error = %err,
                        "session: state file is malformed, starting unauthenticated"
                    );
                    None
                }
            },
            Err(_) => None,
        };

        if token.is_some() {
            info!(path = %store_path.display(), "session: restored persisted admin session");
        }

        Self {
            token: RwLock::new(token),
            store_path,
        }
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|guard| guard.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token
            .read()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }

    /// Login success: stores the token and persists it before returning.
    pub fn set_token(&self, token: &str) -> Result<()> {
        self.transition(Some(token.to_string()))
    }

    /// Logout or explicit invalidation: clears the token and persists.
    pub fn logout(&self) -> Result<()> {
        self.transition(None)
    }

    fn transition(&self, token: Option<String>) -> Result<()> {
        // The lock is held across the file write so racing transitions
        // cannot leave the file and memory holding different tokens.
        let mut guard = self
            .token
            .write()
            .map_err(|_| anyhow::anyhow!("session token lock is poisoned"))?;
        *guard = token.clone();
        self.persist(token)
    }

    fn persist(&self, token: Option<String>) -> Result<()> {
        let persisted = PersistedSession {
            state: PersistedState { token },
        };
        let raw = serde_json::to_string(&persisted)?;
        std::fs::write(&self.store_path, raw).with_context(|| {
            format!(
                "failed to persist session state to {}",
                self.store_path.display()
            )
        })
    }
}

#[cfg(test)]
mod tests;
