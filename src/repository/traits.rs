use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Thought, ThoughtId};

/// Storage operations for thought records
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ThoughtStorage: Send + Sync {
    /// Persist a new thought and index it by creation time
    async fn save_thought(&self, thought: &Thought) -> Result<()>;

    /// Get up to `limit` thoughts, most recently created first
    async fn recent_thoughts(&self, limit: usize) -> Result<Vec<Thought>>;

    /// Atomically add one heart to a thought.
    ///
    /// Returns the updated thought, or `None` if no thought has this id.
    /// Implementations must not read-modify-write in the application.
    async fn increment_hearts(&self, id: &ThoughtId) -> Result<Option<Thought>>;

    /// Check that the backing store is reachable
    async fn ping(&self) -> Result<()>;
}
