use std::sync::Arc;

use crate::error::{Result, ThoughtsError};
use crate::models::{CreateThoughtParams, Thought, ThoughtId};
use crate::repository::ThoughtStorage;
use crate::validation::InputValidator;

/// Maximum number of thoughts returned by a listing
pub const RECENT_THOUGHTS_LIMIT: usize = 20;

/// The thought resource service: validation in front of an injected store
#[derive(Clone)]
pub struct ThoughtService {
    repository: Arc<dyn ThoughtStorage>,
    validator: InputValidator,
}

impl ThoughtService {
    pub fn new(repository: Arc<dyn ThoughtStorage>) -> Self {
        Self {
            repository,
            validator: InputValidator::new(),
        }
    }

    /// Most recent thoughts, newest first, capped at [`RECENT_THOUGHTS_LIMIT`]
    pub async fn list_recent(&self) -> Result<Vec<Thought>> {
        let thoughts = self.repository.recent_thoughts(RECENT_THOUGHTS_LIMIT).await?;
        tracing::debug!("Fetched {} recent thoughts", thoughts.len());
        Ok(thoughts)
    }

    /// Validate and store a new thought
    pub async fn create_thought(&self, params: CreateThoughtParams) -> Result<Thought> {
        let message = self.validator.validate_message(params.message.as_ref())?;

        let thought = Thought::new(message);
        self.repository.save_thought(&thought).await?;

        tracing::info!("Created thought {}", thought.id);
        Ok(thought)
    }

    /// Add one heart to the thought named by `raw_id`
    pub async fn like_thought(&self, raw_id: &str) -> Result<Thought> {
        let id: ThoughtId = raw_id.parse()?;

        match self.repository.increment_hearts(&id).await? {
            Some(thought) => {
                tracing::info!("Thought {} now has {} hearts", thought.id, thought.hearts);
                Ok(thought)
            }
            None => Err(ThoughtsError::NotFound(id.to_string())),
        }
    }

    /// Store reachability check
    pub async fn health(&self) -> Result<()> {
        self.repository.ping().await
    }
}
