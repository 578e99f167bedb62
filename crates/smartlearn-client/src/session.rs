//! Durable session storage.
//!
//! The session is two whole values in a key-value store: the bearer token
//! under `token` and the serialized user profile under `user`. Writes are
//! awaited by the caller; reads that fail are reported as
//! `StorageUnavailable` and the `*_or_absent` helpers turn them into an
//! absent session.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::{ClientError, Result};
use crate::models::{Session, User};

/// Storage key of the bearer token.
pub const TOKEN_KEY: &str = "token";

/// Storage key of the serialized user profile.
pub const USER_KEY: &str = "user";

/// A durable string key-value store.
///
/// Values are read and written whole; there are no partial updates.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}

// ============================================================================
// FileStore
// ============================================================================

/// Key-value store persisted as a single JSON object on disk.
///
/// Every write replaces the file through a temporary sibling and a rename, so
/// a crash mid-write leaves the previous contents intact.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Creates a store backed by `path`. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_contents(&self) -> Result<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ClientError::storage(format!(
                "failed to read '{}': {e}",
                self.path.display()
            ))),
        }
    }

    fn parse_map(&self, contents: &str) -> Result<HashMap<String, String>> {
        serde_json::from_str(contents).map_err(|e| {
            ClientError::storage(format!("corrupted session file '{}': {e}", self.path.display()))
        })
    }

    async fn read_map(&self) -> Result<HashMap<String, String>> {
        match self.read_contents().await? {
            Some(contents) => self.parse_map(&contents),
            None => Ok(HashMap::new()),
        }
    }

    /// Loads the map for a write. A corrupted file is discarded so the next
    /// write replaces it; the flag reports whether that happened.
    async fn read_map_for_write(&self) -> Result<(HashMap<String, String>, bool)> {
        let Some(contents) = self.read_contents().await? else {
            return Ok((HashMap::new(), false));
        };
        match self.parse_map(&contents) {
            Ok(map) => Ok((map, false)),
            Err(e) => {
                warn!(error = %e, "Discarding corrupted session file");
                Ok((HashMap::new(), true))
            }
        }
    }

    async fn write_map(&self, map: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                ClientError::storage(format!("failed to create '{}': {e}", parent.display()))
            })?;
        }

        let contents = serde_json::to_string_pretty(map)
            .map_err(|e| ClientError::storage(format!("failed to serialize session: {e}")))?;

        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, contents).await.map_err(|e| {
            ClientError::storage(format!("failed to write '{}': {e}", tmp_path.display()))
        })?;
        tokio::fs::rename(&tmp_path, &self.path).await.map_err(|e| {
            ClientError::storage(format!("failed to replace '{}': {e}", self.path.display()))
        })
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut map = self.read_map().await?;
        Ok(map.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let (mut map, _) = self.read_map_for_write().await?;
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map).await?;
        debug!(key, path = %self.path.display(), "Stored session value");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let (mut map, discarded) = self.read_map_for_write().await?;
        if map.remove(key).is_some() || discarded {
            self.write_map(&map).await?;
            debug!(key, path = %self.path.display(), "Removed session value");
        }
        Ok(())
    }
}

// ============================================================================
// MemoryStore
// ============================================================================

/// In-process key-value store.
///
/// Can be switched into an unavailable mode to exercise storage failures.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent operation fail with `StorageUnavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(ClientError::storage("memory store marked unavailable"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.check_available()?;
        Ok(self.values.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.check_available()?;
        self.values
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.check_available()?;
        self.values.lock().await.remove(key);
        Ok(())
    }
}

// ============================================================================
// SessionStore
// ============================================================================

/// Typed access to the persisted session.
///
/// Cloning is cheap; all clones share the same backing store.
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Wraps an arbitrary key-value store.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// A session store persisted to `path`.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(FileStore::new(path)))
    }

    /// A session store that lives only as long as the process.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Reads the bearer token.
    pub async fn token(&self) -> Result<Option<String>> {
        self.store.get(TOKEN_KEY).await
    }

    /// Persists the bearer token.
    pub async fn set_token(&self, token: &str) -> Result<()> {
        self.store.set(TOKEN_KEY, token).await
    }

    /// Reads the stored user profile.
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the store cannot be read or the stored
    /// profile is not valid JSON.
    pub async fn user(&self) -> Result<Option<User>> {
        let Some(raw) = self.store.get(USER_KEY).await? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| ClientError::storage(format!("stored user profile is unreadable: {e}")))
    }

    /// Persists the user profile.
    pub async fn set_user(&self, user: &User) -> Result<()> {
        let raw = serde_json::to_string(user)
            .map_err(|e| ClientError::storage(format!("failed to serialize user profile: {e}")))?;
        self.store.set(USER_KEY, &raw).await
    }

    /// Removes both the token and the user profile.
    pub async fn clear_session(&self) -> Result<()> {
        self.store.remove(TOKEN_KEY).await?;
        self.store.remove(USER_KEY).await
    }

    /// Reads the whole session.
    pub async fn session(&self) -> Result<Session> {
        Ok(Session {
            token: self.token().await?,
            user: self.user().await?,
        })
    }

    /// Reads the token, treating an unreadable store as no session.
    pub async fn token_or_absent(&self) -> Option<String> {
        self.token().await.unwrap_or_else(|e| {
            warn!(error = %e, "Could not read session token; treating session as absent");
            None
        })
    }

    /// Reads the user profile, treating an unreadable store or profile as absent.
    pub async fn user_or_absent(&self) -> Option<User> {
        self.user().await.unwrap_or_else(|e| {
            warn!(error = %e, "Could not read user profile; treating it as absent");
            None
        })
    }
}
