//! crates/trivia_core/src/cache.rs
//!
//! Shared store of delivered questions, used to resolve a user's response
//! back to the question and its correct answer.

use crate::domain::{QuestionId, TriviaQuestion};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

pub const DEFAULT_CACHE_CAPACITY: usize = 100;

#[derive(Debug, Default)]
struct Entries {
    by_id: HashMap<QuestionId, TriviaQuestion>,
    order: VecDeque<QuestionId>,
}

/// Cloneable handle to a bounded, internally synchronised question map.
///
/// Clones share the same entries. Once full, the oldest stored question is
/// evicted first.
#[derive(Debug, Clone)]
pub struct QuestionCache {
    inner: Arc<Mutex<Entries>>,
    capacity: usize,
}

impl QuestionCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Entries::default())),
            capacity: capacity.max(1),
        }
    }

    /// Inserts or replaces the question under its id.
    pub fn store(&self, question: TriviaQuestion) {
        let mut entries = self.entries();
        let id = question.id;
        if entries.by_id.insert(id, question).is_some() {
            return;
        }
        entries.order.push_back(id);
        while entries.order.len() > self.capacity {
            if let Some(oldest) = entries.order.pop_front() {
                entries.by_id.remove(&oldest);
            }
        }
    }

    pub fn lookup(&self, id: &QuestionId) -> Option<TriviaQuestion> {
        self.entries().by_id.get(id).cloned()
    }

    pub fn clear(&self) {
        let mut entries = self.entries();
        entries.by_id.clear();
        entries.order.clear();
    }

    pub fn len(&self) -> usize {
        self.entries().by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Every operation leaves the map consistent, so a poisoned lock is still usable.
    fn entries(&self) -> MutexGuard<'_, Entries> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for QuestionCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}
