// Credential storage
// Persisted key-value store for the access token, refresh token and current user

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::OptionalExtension;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, PoisonError, RwLock};

use crate::models::User;

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
pub const CURRENT_USER_KEY: &str = "current_user";

const SESSION_KEYS: &[&str] = &[ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, CURRENT_USER_KEY];

/// Key-value credential store.
///
/// Implementors provide raw `get`/`put`/`remove`; the token accessors are
/// built on top. Read failures are logged and reported as "absent", and an
/// empty stored value counts as absent too.
pub trait CredentialStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn put(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, keys: &[&str]) -> Result<()>;

    fn access_token(&self) -> Option<String> {
        self.read_non_empty(ACCESS_TOKEN_KEY)
    }

    fn refresh_token(&self) -> Option<String> {
        self.read_non_empty(REFRESH_TOKEN_KEY)
    }

    fn set_access_token(&self, token: &str) -> Result<()> {
        self.put(ACCESS_TOKEN_KEY, token)
    }

    fn set_refresh_token(&self, token: &str) -> Result<()> {
        self.put(REFRESH_TOKEN_KEY, token)
    }

    fn current_user(&self) -> Option<User> {
        let raw = self.read_non_empty(CURRENT_USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!("Ignoring unreadable stored user: {}", e);
                None
            }
        }
    }

    fn set_current_user(&self, user: Option<&User>) -> Result<()> {
        match user {
            Some(user) => {
                let raw = serde_json::to_string(user).context("Failed to serialize user")?;
                self.put(CURRENT_USER_KEY, &raw)
            }
            None => self.remove(&[CURRENT_USER_KEY]),
        }
    }

    /// Remove both tokens, keeping the user snapshot
    fn remove_tokens(&self) -> Result<()> {
        self.remove(&[ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY])
    }

    /// Remove everything that belongs to the session
    fn clear(&self) -> Result<()> {
        self.remove(SESSION_KEYS)
    }

    #[doc(hidden)]
    fn read_non_empty(&self, key: &str) -> Option<String> {
        match self.get(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                tracing::warn!("Failed to read {} from credential store: {:#}", key, e);
                None
            }
        }
    }
}

/// Credential store that lives only as long as the process
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with a session's tokens
    pub fn with_tokens(access_token: Option<&str>, refresh_token: Option<&str>) -> Self {
        let mut values = HashMap::new();
        if let Some(token) = access_token {
            values.insert(ACCESS_TOKEN_KEY.to_string(), token.to_string());
        }
        if let Some(token) = refresh_token {
            values.insert(REFRESH_TOKEN_KEY.to_string(), token.to_string());
        }
        Self {
            values: RwLock::new(values),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, keys: &[&str]) -> Result<()> {
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        for key in keys {
            values.remove(*key);
        }
        Ok(())
    }
}

/// Credential store backed by an `auth_kv` table in a SQLite file,
/// so a session survives process restarts
pub struct SqliteCredentialStore {
    conn: Mutex<rusqlite::Connection>,
}

impl SqliteCredentialStore {
    /// Open (or create) the credential database at `path`
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create credential directory: {}", parent.display())
            })?;
        }

        let conn = rusqlite::Connection::open(path)
            .with_context(|| format!("Failed to open SQLite database: {}", path.display()))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS auth_kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )
        .context("Failed to create auth_kv table")?;

        tracing::debug!("Credential store opened: {}", path.display());

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, rusqlite::Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CredentialStore for SqliteCredentialStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.conn()
            .query_row("SELECT value FROM auth_kv WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()
            .with_context(|| format!("Failed to load {} from SQLite", key))
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        self.conn()
            .execute(
                "INSERT INTO auth_kv (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                rusqlite::params![key, value, Utc::now().to_rfc3339()],
            )
            .with_context(|| format!("Failed to store {} in SQLite", key))?;
        Ok(())
    }

    fn remove(&self, keys: &[&str]) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction().context("Failed to begin transaction")?;
        for key in keys {
            tx.execute("DELETE FROM auth_kv WHERE key = ?1", [key])
                .with_context(|| format!("Failed to remove {} from SQLite", key))?;
        }
        tx.commit().context("Failed to commit credential removal")?;
        Ok(())
    }
}
