use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ThoughtsError};

pub const DEFAULT_PORT: u16 = 9000;
pub const DEFAULT_REDIS_URL: &str = "redis://localhost:6379/0";
pub const DEFAULT_KEY_PREFIX: &str = "HappyThoughts";

/// Happy Thoughts service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP listener configuration
    pub server: ServerConfig,
    /// Redis store configuration
    pub redis: RedisConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

/// Redis store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    /// Redis connection URL
    pub url: String,
    /// Key prefix for all thought keys
    pub key_prefix: String,
    /// Connection pool size
    pub pool_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_REDIS_URL.to_string(),
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            pool_size: 16,
        }
    }
}

impl ServerConfig {
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl RedisConfig {
    /// Connection URL with any password masked, for logging.
    pub fn redacted_url(&self) -> String {
        match (self.url.find("://"), self.url.rfind('@')) {
            (Some(scheme_end), Some(at)) if at > scheme_end => {
                format!("{}://***{}", &self.url[..scheme_end], &self.url[at..])
            }
            _ => self.url.clone(),
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, an optional TOML file and the environment
    pub fn load() -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", i64::from(DEFAULT_PORT))?
            .set_default("redis.url", DEFAULT_REDIS_URL)?
            .set_default("redis.key_prefix", DEFAULT_KEY_PREFIX)?
            .set_default("redis.pool_size", 16_i64)?;

        if let Ok(config_file) = std::env::var("HAPPY_THOUGHTS_CONFIG") {
            tracing::info!("Using HAPPY_THOUGHTS_CONFIG: {}", config_file);
            builder = builder.add_source(File::with_name(&config_file).required(false));
        } else {
            builder = builder.add_source(File::with_name("happy-thoughts.toml").required(false));
        }

        // HAPPY_THOUGHTS__SERVER__PORT, HAPPY_THOUGHTS__REDIS__URL, ...
        builder = builder.add_source(
            Environment::with_prefix("HAPPY_THOUGHTS")
                .prefix_separator("__")
                .separator("__"),
        );

        // Plain PORT / REDIS_URL win over everything else
        builder = builder
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .set_override_option("redis.url", std::env::var("REDIS_URL").ok())?;

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(ThoughtsError::Configuration(
                "server.port must be non-zero".to_string(),
            ));
        }

        if !(self.redis.url.starts_with("redis://") || self.redis.url.starts_with("rediss://")) {
            return Err(ThoughtsError::Configuration(format!(
                "redis.url must start with redis:// or rediss://, got {}",
                self.redis.redacted_url()
            )));
        }

        if self.redis.key_prefix.is_empty() || self.redis.key_prefix.contains(':') {
            return Err(ThoughtsError::Configuration(
                "redis.key_prefix must be non-empty and must not contain ':'".to_string(),
            ));
        }

        if self.redis.pool_size == 0 {
            return Err(ThoughtsError::Configuration(
                "redis.pool_size must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
