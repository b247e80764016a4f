use anyhow::{Result, anyhow};
use fjall::Keyspace;
use serde::Deserialize;
use serde::{Serialize, de::DeserializeOwned};
use std::fmt::Debug;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::task;

#[derive(Serialize, Deserialize)]
struct StoredEntry<T> {
    value: T,
    /// Unix timestamp (seconds); `None` never expires
    expires_at: Option<u64>,
}

/// Postcard-encoded values in a fjall keyspace.
///
/// Cloning is cheap and every clone shares the same keyspace.
#[derive(Clone)]
pub struct PersistentCache {
    db: fjall::Database,
    store: Keyspace,
}

/// Entries written together by [`PersistentCache::commit`]
#[derive(Default)]
pub struct CacheBatch {
    entries: Vec<(Vec<u8>, Vec<u8>)>,
}

impl CacheBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a value that never expires
    pub fn put_forever<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        let entry = StoredEntry {
            value,
            expires_at: None,
        };
        self.entries
            .push((key.as_bytes().to_vec(), postcard::to_stdvec(&entry)?));
        Ok(())
    }
}

fn get_from_store(store: Keyspace, key: Vec<u8>) -> anyhow::Result<Option<Vec<u8>>> {
    Ok(store.get(key)?.map(|v| v.to_vec()))
}

fn now_secs() -> Result<u64> {
    Ok(SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs())
}

impl PersistentCache {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = fjall::Database::builder(&path).open()?;
        let items = db.keyspace("cache", fjall::KeyspaceCreateOptions::default)?;
        Ok(PersistentCache { db, store: items })
    }

    /// Stores a serializable value with a time-to-live (TTL).
    #[tracing::instrument(name = "put_cache", level = "debug", skip(self, value))]
    pub async fn put<T: Serialize + Send + Debug + 'static>(
        &self,
        key: &str,
        value: T,
        ttl: Duration,
    ) -> Result<()> {
        let expires_at = SystemTime::now()
            .checked_add(ttl)
            .ok_or(anyhow!("TTL overflow"))?
            .duration_since(UNIX_EPOCH)?
            .as_secs();
        self.insert(key, value, Some(expires_at)).await
    }

    /// Stores a value that only goes away when removed.
    #[tracing::instrument(name = "put_cache_forever", level = "debug", skip(self, value))]
    pub async fn put_forever<T: Serialize + Send + Debug + 'static>(
        &self,
        key: &str,
        value: T,
    ) -> Result<()> {
        self.insert(key, value, None).await
    }

    async fn insert<T: Serialize>(&self, key: &str, value: T, expires_at: Option<u64>) -> Result<()> {
        let store = self.store.clone();
        let key = key.as_bytes().to_vec();
        let entry = StoredEntry { value, expires_at };
        let bytes = postcard::to_stdvec(&entry)?;

        task::spawn_blocking(move || store.insert(key, bytes)).await??;
        Ok(())
    }

    /// Writes every queued entry or none of them.
    #[tracing::instrument(name = "commit_cache_batch", level = "debug", skip_all)]
    pub async fn commit(&self, batch: CacheBatch) -> Result<()> {
        let db = self.db.clone();
        let store = self.store.clone();
        task::spawn_blocking(move || {
            let mut write = db.batch();
            for (key, bytes) in batch.entries {
                write.insert(&store, key, bytes);
            }
            write.commit()
        })
        .await??;
        Ok(())
    }

    /// Retrieves a value if it exists and has not expired.
    /// Returns `None` for cache misses or expired entries.
    #[tracing::instrument(name = "query_cache", level = "debug", skip(self))]
    pub async fn get<T: DeserializeOwned + Send + 'static>(&self, key: &str) -> Result<Option<T>> {
        let store = self.store.clone();
        let key_bytes = key.as_bytes().to_vec();

        let maybe_bytes: Option<Vec<u8>> =
            task::spawn_blocking(move || get_from_store(store, key_bytes)).await??;

        let Some(bytes) = maybe_bytes else {
            tracing::debug!("Key not found");
            return Ok(None);
        };

        let entry: StoredEntry<T> = postcard::from_bytes(&bytes)?;
        match entry.expires_at {
            Some(expires_at) if now_secs()? >= expires_at => {
                tracing::debug!("Key found but expired");
                self.remove(key).await?;
                Ok(None)
            }
            _ => {
                tracing::debug!("Key found and still fresh");
                Ok(Some(entry.value))
            }
        }
    }

    /// Manually removes a key from the cache.
    pub async fn remove(&self, key: &str) -> Result<()> {
        let key = key.as_bytes().to_vec();
        let store = self.store.clone();
        task::spawn_blocking(move || store.remove(key)).await??;
        Ok(())
    }
}
