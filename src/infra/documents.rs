//! Typed documents on top of a [`KeyValueStore`].
//!
//! Every document is JSON text under one key and is always rewritten whole.
//! An absent key reads as an empty list or `None`, never as an error.
//!
//! Each key has its own async mutex. `save_*`, `mutate_*` and `remove` hold it
//! for the whole read-modify-write, so two mutations of the same key run one
//! after the other instead of the second overwriting the first. Updates that
//! touch several keys are still not atomic.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as KeyMutex, OwnedMutexGuard};

use crate::app::error::{AppError, AppResult};
use crate::infra::store::{KeyValueStore, MemoryStore};

#[derive(Clone)]
pub struct DocumentStore {
    backend: Arc<dyn KeyValueStore>,
    locks: Arc<LockTable>,
}

impl DocumentStore {
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self::from_backend(Arc::new(backend))
    }

    pub fn from_backend(backend: Arc<dyn KeyValueStore>) -> Self {
        Self {
            backend,
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    pub async fn keys(&self) -> AppResult<Vec<String>> {
        self.backend.keys().await.map_err(|err| {
            tracing::error!(error = ?err, "failed to list document keys");
            AppError::storage_unavailable("storage is unavailable")
        })
    }

    pub async fn remove(&self, key: &str) -> AppResult<()> {
        let _guard = self.lock(key).await;
        self.backend.remove(key).await.map_err(|err| {
            tracing::error!(error = ?err, key = %key, "failed to remove document");
            AppError::storage_unavailable("storage is unavailable")
        })
    }

    pub async fn load_list<T: DeserializeOwned>(&self, key: &str) -> AppResult<Vec<T>> {
        match self.read(key).await? {
            Some(raw) => decode(key, &raw),
            None => Ok(Vec::new()),
        }
    }

    pub async fn save_list<T: Serialize>(&self, key: &str, items: &[T]) -> AppResult<()> {
        let _guard = self.lock(key).await;
        self.write(key, encode(key, items)?).await
    }

    /// Read the list under `key`, let `f` edit it in place, and write it back.
    /// Nothing is written when `f` returns an error.
    pub async fn mutate_list<T, R, F>(&self, key: &str, f: F) -> AppResult<R>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut Vec<T>) -> AppResult<R>,
    {
        let _guard = self.lock(key).await;
        let mut items: Vec<T> = match self.read(key).await? {
            Some(raw) => decode(key, &raw)?,
            None => Vec::new(),
        };
        let result = f(&mut items)?;
        self.write(key, encode(key, &items)?).await?;
        Ok(result)
    }

    pub async fn load_one<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        match self.read(key).await? {
            Some(raw) => decode(key, &raw).map(Some),
            None => Ok(None),
        }
    }

    pub async fn load_one_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> AppResult<T> {
        Ok(self.load_one(key).await?.unwrap_or_default())
    }

    pub async fn save_one<T: Serialize>(&self, key: &str, value: &T) -> AppResult<()> {
        let _guard = self.lock(key).await;
        self.write(key, encode(key, value)?).await
    }

    pub async fn mutate_one<T, R, F>(&self, key: &str, f: F) -> AppResult<R>
    where
        T: Serialize + DeserializeOwned + Default,
        F: FnOnce(&mut T) -> AppResult<R>,
    {
        let _guard = self.lock(key).await;
        let mut value: T = match self.read(key).await? {
            Some(raw) => decode(key, &raw)?,
            None => T::default(),
        };
        let result = f(&mut value)?;
        self.write(key, encode(key, &value)?).await?;
        Ok(result)
    }

    /// Scalar string documents (bio, image URIs) are stored raw, not JSON-quoted.
    pub async fn load_text(&self, key: &str) -> AppResult<Option<String>> {
        self.read(key).await
    }

    pub async fn save_text(&self, key: &str, value: &str) -> AppResult<()> {
        let _guard = self.lock(key).await;
        self.write(key, value.to_string()).await
    }

    async fn lock(&self, key: &str) -> KeyGuard {
        let lock = {
            let mut locks = lock_table(&self.locks);
            locks
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(KeyMutex::new(())))
                .clone()
        };
        KeyGuard {
            guard: Some(lock.lock_owned().await),
            key: key.to_string(),
            locks: self.locks.clone(),
        }
    }

    async fn read(&self, key: &str) -> AppResult<Option<String>> {
        self.backend.get(key).await.map_err(|err| {
            tracing::error!(error = ?err, key = %key, "failed to read document");
            AppError::storage_unavailable("storage is unavailable")
        })
    }

    async fn write(&self, key: &str, value: String) -> AppResult<()> {
        self.backend.set(key, value).await.map_err(|err| {
            tracing::error!(error = ?err, key = %key, "failed to write document");
            AppError::storage_unavailable("storage is unavailable")
        })
    }
}

type LockTable = Mutex<HashMap<String, Arc<KeyMutex<()>>>>;

fn lock_table(locks: &LockTable) -> std::sync::MutexGuard<'_, HashMap<String, Arc<KeyMutex<()>>>> {
    locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Holds one key's mutex. On drop the key's table entry is removed once no
/// other task holds or waits on it, so the table only tracks keys in use.
struct KeyGuard {
    guard: Option<OwnedMutexGuard<()>>,
    key: String,
    locks: Arc<LockTable>,
}

impl Drop for KeyGuard {
    fn drop(&mut self) {
        self.guard.take();
        let mut locks = lock_table(&self.locks);
        if locks
            .get(&self.key)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&self.key);
        }
    }
}

fn decode<T: DeserializeOwned>(key: &str, raw: &str) -> AppResult<T> {
    serde_json::from_str(raw).map_err(|err| {
        tracing::warn!(error = %err, key = %key, "malformed document");
        AppError::malformed_document(key)
    })
}

fn encode<T: Serialize + ?Sized>(key: &str, value: &T) -> AppResult<String> {
    serde_json::to_string(value).map_err(|err| {
        tracing::error!(error = %err, key = %key, "failed to encode document");
        AppError::malformed_document(key)
    })
}
