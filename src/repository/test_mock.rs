// In-memory storage double for service and router tests
use async_trait::async_trait;
use std::sync::Mutex;
use crate::error::Result;
use crate::models::{Thought, ThoughtId};
use super::*;

pub struct MockRepository {
    // (insertion sequence, thought); the sequence breaks createdAt ties
    thoughts: Mutex<Vec<(u64, Thought)>>,
}

impl MockRepository {
    pub fn new() -> Self {
        Self {
            thoughts: Mutex::new(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.thoughts.lock().unwrap().len()
    }

    pub fn get(&self, id: &ThoughtId) -> Option<Thought> {
        self.thoughts
            .lock()
            .unwrap()
            .iter()
            .find(|(_, t)| &t.id == id)
            .map(|(_, t)| t.clone())
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ThoughtStorage for MockRepository {
    async fn save_thought(&self, thought: &Thought) -> Result<()> {
        let mut thoughts = self.thoughts.lock().unwrap();
        let seq = thoughts.len() as u64;
        thoughts.push((seq, thought.clone()));
        Ok(())
    }

    async fn recent_thoughts(&self, limit: usize) -> Result<Vec<Thought>> {
        let mut thoughts = self.thoughts.lock().unwrap().clone();
        thoughts.sort_by(|(seq_a, a), (seq_b, b)| {
            b.created_at.cmp(&a.created_at).then(seq_b.cmp(seq_a))
        });
        Ok(thoughts.into_iter().take(limit).map(|(_, t)| t).collect())
    }

    async fn increment_hearts(&self, id: &ThoughtId) -> Result<Option<Thought>> {
        let mut thoughts = self.thoughts.lock().unwrap();
        Ok(thoughts.iter_mut().find(|(_, t)| &t.id == id).map(|(_, t)| {
            t.hearts += 1;
            t.clone()
        }))
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
