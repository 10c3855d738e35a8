//! Persisted session: `access_token` and `user_data` key/value pairs read
//! once at startup.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use leadgrid_types::UserProfile;
use tracing::{debug, warn};

use crate::store::{Action, AuthState};
use crate::{Error, Result};

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const USER_DATA_KEY: &str = "user_data";

/// String key/value storage surviving restarts.
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl SessionStorage for MemorySessionStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries().remove(key);
        Ok(())
    }
}

/// JSON object file, e.g. `<data dir>/session.json`.
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join("session.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content)
            .map_err(|e| Error::Session(format!("{}: {}", self.path.display(), e)))
    }

    fn write(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

impl SessionStorage for FileSessionStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.read().unwrap_or_default();
        entries.insert(key.to_string(), value.to_string());
        self.write(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        match self.read() {
            Ok(mut entries) => {
                if entries.remove(key).is_some() {
                    self.write(&entries)?;
                }
                Ok(())
            }
            // unreadable file: nothing worth keeping
            Err(_) => self.write(&BTreeMap::new()),
        }
    }
}

/// Restore the signed-in user.
///
/// Both keys must be present and `user_data` must decode; otherwise both
/// keys are cleared and the session starts unauthenticated.
pub fn hydrate<S: SessionStorage + ?Sized>(storage: &S) -> AuthState {
    match read_session(storage) {
        Ok(Some((access_token, user))) => {
            debug!(user_id = %user.id, "session restored");
            AuthState {
                access_token: Some(access_token),
                user: Some(user),
            }
        }
        Ok(None) => {
            clear_quietly(storage);
            AuthState::default()
        }
        Err(err) => {
            warn!(error = %err, "discarding unreadable session");
            clear_quietly(storage);
            AuthState::default()
        }
    }
}

/// Action restoring the persisted session, if there is one.
pub fn restore_action<S: SessionStorage + ?Sized>(storage: &S) -> Option<Action> {
    let auth = hydrate(storage);
    Some(Action::SessionRestored {
        access_token: auth.access_token?,
        user: auth.user?,
    })
}

fn read_session<S: SessionStorage + ?Sized>(
    storage: &S,
) -> Result<Option<(String, UserProfile)>> {
    let token = storage.get(ACCESS_TOKEN_KEY)?;
    let user_data = storage.get(USER_DATA_KEY)?;
    let (Some(token), Some(user_data)) = (token, user_data) else {
        return Ok(None);
    };
    let user: UserProfile = serde_json::from_str(&user_data)?;
    Ok(Some((token, user)))
}

fn clear_quietly<S: SessionStorage + ?Sized>(storage: &S) {
    if let Err(err) = clear(storage) {
        warn!(error = %err, "failed to clear session");
    }
}

pub fn persist<S: SessionStorage + ?Sized>(
    storage: &S,
    access_token: &str,
    user: &UserProfile,
) -> Result<()> {
    storage.set(ACCESS_TOKEN_KEY, access_token)?;
    storage.set(USER_DATA_KEY, &serde_json::to_string(user)?)?;
    Ok(())
}

pub fn clear<S: SessionStorage + ?Sized>(storage: &S) -> Result<()> {
    storage.remove(ACCESS_TOKEN_KEY)?;
    storage.remove(USER_DATA_KEY)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn user() -> UserProfile {
        UserProfile {
            id: "u1".into(),
            email: "neha@example.com".into(),
            first_name: "Neha".into(),
            last_name: "Kapoor".into(),
            role: Some("admin".into()),
        }
    }

    #[test]
    fn test_hydrate_round_trip() -> Result<()> {
        let storage = MemorySessionStorage::new();
        persist(&storage, "tok", &user())?;

        let auth = hydrate(&storage);
        assert!(auth.is_authenticated());
        assert_eq!(auth.user, Some(user()));
        Ok(())
    }

    #[test]
    fn test_missing_token_clears_both() -> Result<()> {
        let storage = MemorySessionStorage::new();
        storage.set(USER_DATA_KEY, &serde_json::to_string(&user())?)?;

        let auth = hydrate(&storage);
        assert!(!auth.is_authenticated());
        assert_eq!(storage.get(USER_DATA_KEY)?, None);
        Ok(())
    }

    #[test]
    fn test_corrupt_user_clears_both() -> Result<()> {
        let storage = MemorySessionStorage::new();
        storage.set(ACCESS_TOKEN_KEY, "tok")?;
        storage.set(USER_DATA_KEY, "{not json")?;

        assert_eq!(hydrate(&storage), AuthState::default());
        assert_eq!(storage.get(ACCESS_TOKEN_KEY)?, None);
        Ok(())
    }

    #[test]
    fn test_file_storage_persists() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let storage = FileSessionStorage::in_dir(temp_dir.path());
        persist(&storage, "tok", &user())?;

        let reopened = FileSessionStorage::in_dir(temp_dir.path());
        assert!(restore_action(&reopened).is_some());

        clear(&reopened)?;
        assert!(restore_action(&reopened).is_none());
        Ok(())
    }
}
