// session.rs
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

use anyhow::{Context, Result};

use crate::models::usermodel::SessionUser;

const TOKEN_KEY: &str = "userToken";
const USER_KEY: &str = "userData";

/// File-backed key-value store for the persisted session: the bearer token
/// and the signed-in user record, written at login and cleared at logout
/// (or by a 401 from the API). A missing file is simply an empty session.
pub struct SessionStore {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl SessionStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read session file {}", path.display()))?;
            serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!("Corrupt session file {}: {}", path.display(), e);
                HashMap::new()
            })
        } else {
            HashMap::new()
        };
        Ok(SessionStore {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn token(&self) -> Option<String> {
        self.entries.read().unwrap().get(TOKEN_KEY).cloned()
    }

    /// The signed-in user, or `None` when no session is persisted. A corrupt
    /// record also resolves to `None`: the conversation screens then render
    /// read-only instead of assuming participancy.
    pub fn current_user(&self) -> Option<SessionUser> {
        let entries = self.entries.read().unwrap();
        let raw = entries.get(USER_KEY)?;
        match serde_json::from_str(raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!("Corrupt user record in session store: {}", e);
                None
            }
        }
    }

    pub fn save_session(&self, token: &str, user: &SessionUser) -> Result<()> {
        let mut entries = self.entries.write().unwrap();
        entries.insert(TOKEN_KEY.to_string(), token.to_string());
        entries.insert(USER_KEY.to_string(), serde_json::to_string(user)?);
        self.persist(&entries)
    }

    /// Drop both the token and the user record. Invoked by the API layer
    /// when the backend answers 401; the outer app reacts on its next
    /// identity read.
    pub fn clear(&self) -> Result<()> {
        let mut entries = self.entries.write().unwrap();
        entries.remove(TOKEN_KEY);
        entries.remove(USER_KEY);
        self.persist(&entries)
    }

    fn persist(&self, entries: &HashMap<String, String>) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create session dir {}", dir.display()))?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(entries)?)
            .with_context(|| format!("Failed to write session file {}", self.path.display()))?;
        Ok(())
    }
}
