pub mod app_config;
pub mod cache;
pub mod redis_repo;

pub use app_config::Config;
pub use cache::{CacheError, CacheStore, Clock, ListCache, ManualClock, MemoryStore, SystemClock};
pub use redis_repo::RedisStore;
