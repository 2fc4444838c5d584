use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache backend error: {0}")]
    Backend(String),

    #[error("Cache entry error: {0}")]
    Entry(String),
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    millis: AtomicI64,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self { millis: AtomicI64::new(start.timestamp_millis()) }
    }

    pub fn advance(&self, by: Duration) {
        self.millis.fetch_add(by.num_milliseconds(), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.millis.load(Ordering::SeqCst)).unwrap_or_default()
    }
}

/// Raw string store behind the list cache.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// `ttl` is a housekeeping hint; freshness is decided by [`ListCache`].
    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError>;

    async fn remove(&self, key: &str) -> Result<(), CacheError>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String, _ttl: Duration) -> Result<(), CacheError> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    data: Vec<Value>,
    /// Milliseconds since the epoch when the list was fetched.
    timestamp: i64,
}

/// Read-through cache for list endpoints. Store failures never fail a read.
#[derive(Clone)]
pub struct ListCache {
    store: Arc<dyn CacheStore>,
    clock: Arc<dyn Clock>,
}

impl ListCache {
    pub fn new(store: Arc<dyn CacheStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), Arc::new(SystemClock))
    }

    async fn fresh(&self, key: &str, ttl: Duration) -> Option<Vec<Value>> {
        let raw = match self.store.get(key).await {
            Ok(raw) => raw?,
            Err(e) => {
                warn!("Cache read failed for {}: {}", key, e);
                return None;
            }
        };
        let entry: CacheEntry = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Discarding unreadable cache entry {}: {}", key, e);
                return None;
            }
        };
        let age = self.clock.now().timestamp_millis() - entry.timestamp;
        (age >= 0 && age < ttl.num_milliseconds()).then_some(entry.data)
    }

    pub async fn get_or_fetch<E, F, Fut>(&self, key: &str, ttl: Duration, fetch: F) -> Result<Vec<Value>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Value>, E>>,
    {
        if let Some(data) = self.fresh(key, ttl).await {
            debug!("Cache hit: {}", key);
            return Ok(data);
        }

        debug!("Cache miss: {}", key);
        let data = fetch().await?;

        let entry = CacheEntry { data, timestamp: self.clock.now().timestamp_millis() };
        match serde_json::to_string(&entry) {
            Ok(raw) => {
                if let Err(e) = self.store.set(key, raw, ttl).await {
                    warn!("Cache write failed for {}: {}", key, e);
                }
            }
            Err(e) => warn!("Could not encode cache entry {}: {}", key, e),
        }
        Ok(entry.data)
    }

    pub async fn invalidate(&self, key: &str) {
        if let Err(e) = self.store.remove(key).await {
            warn!("Cache invalidation failed for {}: {}", key, e);
        }
    }
}
