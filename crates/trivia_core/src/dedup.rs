//! crates/trivia_core/src/dedup.rs
//!
//! Bounded record of recently delivered question texts.

use std::collections::VecDeque;

pub const DEFAULT_DEDUP_CAPACITY: usize = 20;

/// Insertion-ordered, FIFO-evicting window of question texts.
#[derive(Debug, Clone)]
pub struct DedupWindow {
    entries: VecDeque<String>,
    capacity: usize,
}

impl DedupWindow {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn contains(&self, text: &str) -> bool {
        self.entries.iter().any(|entry| entry == text)
    }

    /// Appends `text`, evicting the oldest entry when at capacity.
    /// Callers check [`DedupWindow::contains`] first.
    pub fn record(&mut self, text: impl Into<String>) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(text.into());
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for DedupWindow {
    fn default() -> Self {
        Self::new(DEFAULT_DEDUP_CAPACITY)
    }
}
