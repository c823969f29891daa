//! Parsed document cache
//!
//! Keyed by the full pattern text. When the cache is full it is cleared before
//! the next insert.

use bomgen_core::PatternDocument;
use dashmap::DashMap;
use std::sync::Arc;

/// Concurrent cache of parsed pattern documents
#[derive(Debug)]
pub struct ParseCache {
    entries: DashMap<String, Arc<PatternDocument>>,
    capacity: usize,
}

impl ParseCache {
    /// Create a new cache holding at most `capacity` documents (0 disables caching)
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: DashMap::new(),
            capacity,
        }
    }

    /// Get a cached document
    pub fn get(&self, text: &str) -> Option<Arc<PatternDocument>> {
        self.entries.get(text).map(|entry| Arc::clone(entry.value()))
    }

    /// Store a document
    pub fn insert(&self, text: &str, document: Arc<PatternDocument>) {
        if self.capacity == 0 {
            return;
        }

        if self.entries.len() >= self.capacity && !self.entries.contains_key(text) {
            tracing::debug!("Parse cache full ({} entries), clearing", self.entries.len());
            self.entries.clear();
        }

        self.entries.insert(text.to_string(), document);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clear the cache
    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for ParseCache {
    fn default() -> Self {
        Self::new(64)
    }
}
