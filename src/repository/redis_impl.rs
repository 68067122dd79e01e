use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;
use crate::models::{Thought, ThoughtId};
use crate::redis::RedisManager;
use super::*;

/// Redis implementation of the storage trait
pub struct RedisRepository {
    redis: Arc<RedisManager>,
    key_prefix: String,
}

impl RedisRepository {
    pub fn new(redis: Arc<RedisManager>, key_prefix: impl Into<String>) -> Self {
        Self {
            redis,
            key_prefix: key_prefix.into(),
        }
    }

    fn thought_key_prefix(&self) -> String {
        format!("{}:Thoughts:", self.key_prefix)
    }

    pub fn thought_key(&self, thought_id: &ThoughtId) -> String {
        format!("{}{}", self.thought_key_prefix(), thought_id)
    }

    pub fn created_index_key(&self) -> String {
        format!("{}:Thoughts:by_created", self.key_prefix)
    }
}

#[async_trait]
impl ThoughtStorage for RedisRepository {
    async fn save_thought(&self, thought: &Thought) -> Result<()> {
        let key = self.thought_key(&thought.id);
        self.redis
            .hset_indexed(
                &key,
                &thought.to_hash_fields(),
                &self.created_index_key(),
                &thought.id.to_string(),
                thought.created_score(),
            )
            .await?;

        tracing::debug!("Stored thought {} at {}", thought.id, key);
        Ok(())
    }

    async fn recent_thoughts(&self, limit: usize) -> Result<Vec<Thought>> {
        let prefix = self.thought_key_prefix();
        let hashes = self
            .redis
            .recent_hashes(&self.created_index_key(), &prefix, limit)
            .await?;

        hashes
            .iter()
            .map(|fields| {
                let key = fields
                    .get("id")
                    .map(|id| format!("{}{}", prefix, id))
                    .unwrap_or_else(|| prefix.clone());
                Thought::from_hash(&key, fields)
            })
            .collect()
    }

    async fn increment_hearts(&self, id: &ThoughtId) -> Result<Option<Thought>> {
        let key = self.thought_key(id);
        match self.redis.increment_hearts(&key).await? {
            Some(fields) => Ok(Some(Thought::from_hash(&key, &fields)?)),
            None => Ok(None),
        }
    }

    async fn ping(&self) -> Result<()> {
        self.redis.ping().await
    }
}
