use crate::api::User;
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// File-backed session blob holding the logged-in user. There is no expiry or
/// refresh: a session is valid until the file is removed.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// `None` when no session file exists. A malformed blob is a hard error,
    /// not a silent logout.
    pub fn load(&self) -> Result<Option<User>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read session file {}", self.path.display()))?;
        let user: User = serde_json::from_str(&data)
            .with_context(|| format!("malformed session file {}", self.path.display()))?;
        Ok(Some(user))
    }

    pub fn save(&self, user: &User) -> Result<()> {
        let data = serde_json::to_string_pretty(user)?;
        fs::write(&self.path, data)
            .with_context(|| format!("failed to write session file {}", self.path.display()))?;
        log::info!("Session saved for user {}", user.id);
        Ok(())
    }

    /// Clearing an absent session is a no-op.
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("failed to remove session file {}", self.path.display()))?;
            log::info!("Session cleared");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(name: &str) -> SessionStore {
        let path = std::env::temp_dir().join(format!("painel-session-{}-{}", std::process::id(), name));
        let _ = fs::remove_file(&path);
        SessionStore::new(path)
    }

    fn sample_user() -> User {
        User {
            id: 10,
            name: "Maria Souza".to_string(),
            email: "maria@x.com".to_string(),
            password: "123456".to_string(),
        }
    }

    #[test]
    fn load_without_file_is_none() {
        let store = temp_store("absent");
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn save_then_load_round_trips() {
        let store = temp_store("roundtrip");
        store.save(&sample_user()).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.id, 10);
        assert_eq!(loaded.email, "maria@x.com");
        store.clear().unwrap();
    }

    #[test]
    fn clear_is_idempotent() {
        let store = temp_store("clear");
        store.save(&sample_user()).unwrap();
        store.clear().unwrap();
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn malformed_blob_is_an_error() {
        let store = temp_store("malformed");
        fs::write(store.path.clone(), "{not json").unwrap();
        assert!(store.load().is_err());
        store.clear().unwrap();
    }
}
