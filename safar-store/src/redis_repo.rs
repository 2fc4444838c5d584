use async_trait::async_trait;
use chrono::Duration;
use redis::AsyncCommands;
use tracing::info;

use crate::cache::{CacheError, CacheStore};

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        CacheError::Backend(err.to_string())
    }
}

/// Shared list cache for several back-office instances.
#[derive(Clone)]
pub struct RedisStore {
    client: redis::Client,
    prefix: String,
}

impl RedisStore {
    pub fn new(connection_string: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(connection_string)?;
        info!("Redis list cache configured");
        Ok(Self { client, prefix: "safar:lists:".to_string() })
    }

    fn key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }
}

#[async_trait]
impl CacheStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get(self.key(key)).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let seconds = ttl.num_seconds().max(1) as u64;
        conn.set_ex::<_, _, ()>(self.key(key), value, seconds).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.del::<_, ()>(self.key(key)).await?;
        Ok(())
    }
}
