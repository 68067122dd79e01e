use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use deadpool::managed::{PoolConfig, QueueMode, Timeouts};
use deadpool_redis::{Config, Pool, Runtime};
use redis::Script;

use crate::config::RedisConfig;
use crate::error::{Result, ThoughtsError};
use crate::lua_scripts;

/// Server-side scripts, hashed once at startup.
pub struct LoadedScripts {
    pub like_thought: Script,
    pub recent_thoughts: Script,
}

impl LoadedScripts {
    pub fn new() -> Self {
        Self {
            like_thought: Script::new(lua_scripts::LIKE_THOUGHT_SCRIPT),
            recent_thoughts: Script::new(lua_scripts::RECENT_THOUGHTS_SCRIPT),
        }
    }
}

impl Default for LoadedScripts {
    fn default() -> Self {
        Self::new()
    }
}

/// Redis connection manager
#[derive(Clone)]
pub struct RedisManager {
    pool: Arc<Pool>,
    scripts: Arc<LoadedScripts>,
}

impl RedisManager {
    /// Create a new Redis manager with connection pool
    pub async fn new(config: &RedisConfig) -> Result<Self> {
        tracing::info!("Connecting to Redis at {}", config.redacted_url());

        let mut cfg = Config::from_url(&config.url);
        cfg.pool = Some(PoolConfig {
            max_size: config.pool_size,
            timeouts: Timeouts {
                wait: Some(Duration::from_secs(5)),
                create: Some(Duration::from_secs(5)),
                recycle: Some(Duration::from_secs(5)),
            },
            queue_mode: QueueMode::Fifo,
        });

        let pool = cfg
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| ThoughtsError::PoolCreation(e.to_string()))?;

        let instance = Self {
            pool: Arc::new(pool),
            scripts: Arc::new(LoadedScripts::new()),
        };

        instance.ping().await?;
        tracing::info!("Redis connection established");

        instance.load_scripts().await?;

        Ok(instance)
    }

    /// Get a connection from the pool
    pub async fn get_connection(&self) -> Result<deadpool_redis::Connection> {
        Ok(self.pool.get().await?)
    }

    pub async fn ping(&self) -> Result<()> {
        let mut conn = self.get_connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    /// Register scripts with the server so the first request hits EVALSHA
    pub async fn load_scripts(&self) -> Result<()> {
        let mut conn = self.get_connection().await?;

        for (name, source, script) in [
            ("like_thought", lua_scripts::LIKE_THOUGHT_SCRIPT, &self.scripts.like_thought),
            ("recent_thoughts", lua_scripts::RECENT_THOUGHTS_SCRIPT, &self.scripts.recent_thoughts),
        ] {
            let sha: String = redis::cmd("SCRIPT")
                .arg("LOAD")
                .arg(source)
                .query_async(&mut conn)
                .await?;
            if sha != script.get_hash() {
                return Err(ThoughtsError::Internal(format!(
                    "script {} loaded with unexpected hash {}",
                    name, sha
                )));
            }
            tracing::debug!("Loaded script {} ({})", name, sha);
        }

        tracing::info!("Lua scripts loaded");
        Ok(())
    }

    /// Write a hash and add its member to a sorted-set index in one MULTI/EXEC
    pub async fn hset_indexed(
        &self,
        key: &str,
        fields: &[(&str, String)],
        index_key: &str,
        member: &str,
        score: f64,
    ) -> Result<()> {
        let mut conn = self.get_connection().await?;

        let _: () = redis::pipe()
            .atomic()
            .hset_multiple(key, fields)
            .ignore()
            .zadd(index_key, member, score)
            .ignore()
            .query_async(&mut conn)
            .await?;

        Ok(())
    }

    /// Atomically increment the `hearts` field of an existing hash.
    ///
    /// Returns the updated hash, or `None` when `key` does not exist.
    pub async fn increment_hearts(&self, key: &str) -> Result<Option<HashMap<String, String>>> {
        let mut conn = self.get_connection().await?;

        let result: Option<HashMap<String, String>> = self
            .scripts
            .like_thought
            .key(key)
            .arg(1)
            .invoke_async(&mut conn)
            .await?;

        Ok(result)
    }

    /// Fetch up to `limit` hashes named `{key_prefix}{member}`, newest member first
    pub async fn recent_hashes(
        &self,
        index_key: &str,
        key_prefix: &str,
        limit: usize,
    ) -> Result<Vec<HashMap<String, String>>> {
        let mut conn = self.get_connection().await?;

        let result: Vec<HashMap<String, String>> = self
            .scripts
            .recent_thoughts
            .key(index_key)
            .arg(limit)
            .arg(key_prefix)
            .invoke_async(&mut conn)
            .await?;

        Ok(result)
    }

    /// Delete keys; used to clean up after integration tests
    pub async fn del(&self, keys: &[String]) -> Result<()> {
        if keys.is_empty() {
            return Ok(());
        }
        let mut conn = self.get_connection().await?;
        let _: () = redis::cmd("DEL").arg(keys).query_async(&mut conn).await?;
        Ok(())
    }
}
