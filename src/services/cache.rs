//! In-process memo of aggregated search results.
//!
//! Entries live for a fixed TTL counted from insertion (reads do not extend
//! it). When the map grows past `max_entries` the oldest insertion is evicted.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

use crate::models::SearchResult;

struct CacheEntry {
    value: SearchResult,
    created_at: Instant,
    seq: u64,
}

#[derive(Default)]
struct CacheInner {
    entries: HashMap<String, CacheEntry>,
    /// Insertion order as `(key, seq)`. Pairs whose seq no longer matches the
    /// live entry are stale and skipped.
    order: VecDeque<(String, u64)>,
    next_seq: u64,
}

impl CacheInner {
    fn evict_oldest(&mut self) {
        while let Some((key, seq)) = self.order.pop_front() {
            if self.entries.get(&key).is_some_and(|e| e.seq == seq) {
                self.entries.remove(&key);
                return;
            }
        }
    }

    fn compact_order(&mut self) {
        let entries = &self.entries;
        self.order
            .retain(|(key, seq)| entries.get(key).is_some_and(|e| e.seq == *seq));
    }
}

pub struct ResultCache {
    ttl: Duration,
    max_entries: usize,
    inner: Mutex<CacheInner>,
}

impl ResultCache {
    #[must_use]
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            ttl,
            max_entries: max_entries.max(1),
            inner: Mutex::new(CacheInner::default()),
        }
    }

    /// Returns a clone of the live entry. Expired entries are removed.
    pub fn get(&self, key: &str) -> Option<SearchResult> {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);

        let expired = match inner.entries.get(key) {
            None => return None,
            Some(entry) => entry.created_at.elapsed() >= self.ttl,
        };

        if expired {
            inner.entries.remove(key);
            return None;
        }

        inner.entries.get(key).map(|e| e.value.clone())
    }

    pub fn put(&self, key: String, value: SearchResult) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);

        let seq = inner.next_seq;
        inner.next_seq += 1;

        inner.order.push_back((key.clone(), seq));
        inner.entries.insert(
            key,
            CacheEntry {
                value,
                created_at: Instant::now(),
                seq,
            },
        );

        while inner.entries.len() > self.max_entries {
            inner.evict_oldest();
        }

        if inner.order.len() > self.max_entries.saturating_mul(2) {
            inner.compact_order();
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.entries.clear();
        inner.order.clear();
    }
}
