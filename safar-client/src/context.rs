use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::Duration;
use serde_json::Value;
use tracing::{info, warn};

use safar_core::{ApiError, ApiResult, Endpoint, RestBackend};
use safar_forms::FormMode;
use safar_shared::Masked;
use safar_store::{Config, ListCache, MemoryStore, RedisStore, SystemClock};

use crate::client::ApiClient;

/// Where and as whom requests are sent.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub base_url: String,
    pub access_token: Option<Masked<String>>,
    pub organization_id: i64,
    pub timeout: StdDuration,
}

impl AppContext {
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_url: config.api.base_url.clone(),
            access_token: config.auth.access_token.clone(),
            organization_id: config.organization.id,
            timeout: StdDuration::from_secs(config.api.timeout_seconds),
        }
    }
}

/// Everything a screen operation needs, passed explicitly.
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn RestBackend>,
    pub cache: ListCache,
    pub organization: i64,
    pub reference_ttl: Duration,
    pub listing_ttl: Duration,
}

impl AppState {
    pub fn new(backend: Arc<dyn RestBackend>, cache: ListCache, organization: i64) -> Self {
        Self {
            backend,
            cache,
            organization,
            reference_ttl: Duration::minutes(30),
            listing_ttl: Duration::minutes(5),
        }
    }

    pub fn from_config(config: &Config) -> ApiResult<Self> {
        let context = AppContext::from_config(config);
        let backend = Arc::new(ApiClient::new(&context)?);

        let cache = match &config.cache.redis_url {
            Some(url) => match RedisStore::new(url) {
                Ok(store) => ListCache::new(Arc::new(store), Arc::new(SystemClock)),
                Err(e) => {
                    warn!("Falling back to in-memory list cache: {}", e);
                    ListCache::new(Arc::new(MemoryStore::new()), Arc::new(SystemClock))
                }
            },
            None => ListCache::in_memory(),
        };
        info!("Back office client ready for organization {}", context.organization_id);

        Ok(Self {
            reference_ttl: config.cache.reference_ttl(),
            listing_ttl: config.cache.listing_ttl(),
            ..Self::new(backend, cache, context.organization_id)
        })
    }

    pub fn cache_key(&self, endpoint: Endpoint) -> String {
        endpoint.cache_key(self.organization)
    }

    /// List rows through the read-through cache.
    pub async fn cached_list(&self, endpoint: Endpoint, ttl: Duration) -> ApiResult<Vec<Value>> {
        let backend = self.backend.clone();
        self.cache
            .get_or_fetch(&self.cache_key(endpoint), ttl, move || async move {
                backend.list(endpoint, &[]).await
            })
            .await
    }

    pub async fn invalidate(&self, endpoint: Endpoint) {
        self.cache.invalidate(&self.cache_key(endpoint)).await;
    }

    /// POST in add mode, PUT in edit mode, then drops the cached list.
    pub async fn write(&self, endpoint: Endpoint, mode: FormMode, body: &Value) -> ApiResult<Value> {
        let saved = match mode {
            FormMode::Add => self.backend.create(endpoint, body).await,
            FormMode::Edit(id) => self.backend.update(endpoint, id, body).await,
        };
        match saved {
            Ok(saved) => {
                self.invalidate(endpoint).await;
                Ok(saved)
            }
            Err(e) => {
                warn!("Saving to {} failed: {}", endpoint.path(), e);
                Err(e)
            }
        }
    }

    pub async fn remove(&self, endpoint: Endpoint, id: i64) -> ApiResult<()> {
        self.backend.delete(endpoint, id).await?;
        self.invalidate(endpoint).await;
        Ok(())
    }
}

pub(crate) fn to_body<T: serde::Serialize>(payload: &T) -> ApiResult<Value> {
    serde_json::to_value(payload).map_err(|e| ApiError::Decode(e.to_string()))
}
