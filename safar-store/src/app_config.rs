use serde::Deserialize;
use std::env;

use safar_shared::Masked;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    pub organization: OrganizationConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AuthConfig {
    /// Bearer token; absent means every call fails with a login redirect.
    #[serde(default)]
    pub access_token: Option<Masked<String>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OrganizationConfig {
    pub id: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    pub reference_ttl_minutes: i64,
    pub listing_ttl_minutes: i64,
    pub redis_url: Option<String>,
}

impl CacheConfig {
    pub fn reference_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.reference_ttl_minutes)
    }

    pub fn listing_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.listing_ttl_minutes)
    }
}

fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
    config::Config::builder()
        .set_default("api.base_url", "http://localhost:8000")?
        .set_default("api.timeout_seconds", 30_i64)?
        .set_default("cache.reference_ttl_minutes", 30_i64)?
        .set_default("cache.listing_ttl_minutes", 5_i64)
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = defaults()?
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in; holds the developer's token.
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. `SAFAR__AUTH__ACCESS_TOKEN=...`
            .add_source(config::Environment::with_prefix("SAFAR").prefix_separator("__").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    /// Builds settings from TOML text layered over the defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, config::ConfigError> {
        defaults()?
            .add_source(config::File::from_str(text, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_sections() {
        let config = Config::from_toml_str(
            r#"
            [organization]
            id = 7
            "#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.api.timeout_seconds, 30);
        assert_eq!(config.organization.id, 7);
        assert_eq!(config.cache.reference_ttl(), chrono::Duration::minutes(30));
        assert_eq!(config.cache.listing_ttl(), chrono::Duration::minutes(5));
        assert!(config.cache.redis_url.is_none());
        assert!(config.auth.access_token.is_none());
    }

    #[test]
    fn test_token_is_masked_in_debug() {
        let config = Config::from_toml_str(
            r#"
            [api]
            base_url = "https://agency.example.com"
            [auth]
            access_token = "eyJhbGciOi.secret"
            [organization]
            id = 3
            [cache]
            listing_ttl_minutes = 1
            redis_url = "redis://127.0.0.1/"
            "#,
        )
        .unwrap();

        let token = config.auth.access_token.as_ref().unwrap();
        assert_eq!(token.expose(), "eyJhbGciOi.secret");
        assert!(!format!("{config:?}").contains("secret"));
        assert_eq!(config.cache.listing_ttl_minutes, 1);
        assert_eq!(config.cache.redis_url.as_deref(), Some("redis://127.0.0.1/"));
    }

    #[test]
    fn test_missing_organization_is_an_error() {
        assert!(Config::from_toml_str("").is_err());
    }
}
