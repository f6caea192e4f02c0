//! Persisted session snapshot.
//!
//! The snapshot is two entries in a key/value store: the raw token under
//! `auth_token` and the JSON-serialized profile under `user`. Nothing here
//! looks at token expiry; a stale token stays until the server rejects it.

use crate::errors::StoreError;
use crate::models::UserProfile;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const TOKEN_KEY: &str = "auth_token";
pub const USER_KEY: &str = "user";

/// Key/value storage for the session snapshot.
pub trait TokenStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// Process-local store. Forgets everything when dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    entries: HashMap<String, String>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Store backed by a single JSON object file.
///
/// The file and its parent directories are created on first write. The file
/// is removed once its last entry is gone.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<HashMap<String, String>, StoreError> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }

        let content = fs::read_to_string(&self.path)?;
        match serde_json::from_str(&content) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!(
                    "Ignoring unreadable session file {}: {}",
                    self.path.display(),
                    e
                );
                Ok(HashMap::new())
            }
        }
    }

    fn save(&self, entries: &HashMap<String, String>) -> Result<(), StoreError> {
        if entries.is_empty() {
            if self.path.exists() {
                fs::remove_file(&self.path)?;
            }
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.load()?;
        if entries.remove(key).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }
}

/// What a store currently holds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    pub token: Option<String>,
    pub user: Option<UserProfile>,
}

/// Reads the snapshot. An empty token counts as absent, and a profile that
/// does not deserialize is dropped with a warning.
pub fn load_snapshot<S: TokenStore + ?Sized>(store: &S) -> Result<SessionSnapshot, StoreError> {
    let token = store.get(TOKEN_KEY)?.filter(|token| !token.is_empty());

    let user = match store.get(USER_KEY)? {
        Some(raw) => match serde_json::from_str::<UserProfile>(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!("Discarding cached profile that failed to parse: {}", e);
                None
            }
        },
        None => None,
    };

    Ok(SessionSnapshot { token, user })
}

pub fn persist_snapshot<S: TokenStore + ?Sized>(
    store: &mut S,
    token: &str,
    user: &UserProfile,
) -> Result<(), StoreError> {
    store.set(TOKEN_KEY, token)?;
    persist_profile(store, user)
}

pub fn persist_profile<S: TokenStore + ?Sized>(
    store: &mut S,
    user: &UserProfile,
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(user)?;
    store.set(USER_KEY, &raw)
}

pub fn clear_snapshot<S: TokenStore + ?Sized>(store: &mut S) -> Result<(), StoreError> {
    store.remove(TOKEN_KEY)?;
    store.remove(USER_KEY)
}
