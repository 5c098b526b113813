//! In-process [`GeocodeStore`] backed by a bounded map.

use super::{CacheEntry, CachedLookup, GeocodeStore};
use chrono::{DateTime, Duration, Utc};
use std::collections::{HashMap, VecDeque};
use tokio::sync::Mutex;

/// Bounded in-memory store.
///
/// Entries expire lazily on read and are reclaimed in bulk by
/// [`GeocodeStore::sweep`]. When the store is full, expired entries are
/// dropped first and then the oldest insertion is evicted.
#[derive(Debug)]
pub struct MemoryStore {
    capacity: usize,
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    /// key -> (insertion sequence, entry)
    entries: HashMap<String, (u64, CacheEntry)>,

    /// insertion order; records whose sequence no longer matches the map
    /// are stale and skipped
    order: VecDeque<(u64, String)>,

    next_seq: u64,
}

impl Inner {
    fn remove_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, (_, entry)| !entry.is_expired(now));
        let removed = before - self.entries.len();
        if removed > 0 {
            self.compact();
        }

        removed
    }

    fn evict_oldest(&mut self) -> Option<String> {
        while let Some((seq, key)) = self.order.pop_front() {
            let current = matches!(self.entries.get(&key), Some((s, _)) if *s == seq);
            if current {
                self.entries.remove(&key);
                return Some(key);
            }
        }

        None
    }

    fn compact(&mut self) {
        let entries = &self.entries;
        self.order
            .retain(|(seq, key)| matches!(entries.get(key), Some((s, _)) if s == seq));
    }
}

impl MemoryStore {
    /// Creates a store holding at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize) -> Self {
        if capacity == 0 {
            cache_warn!("(new) capacity 0 requested, using 1.");
        }

        Self {
            capacity: capacity.max(1),
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[async_trait::async_trait]
impl GeocodeStore for MemoryStore {
    async fn get(&self, key: &str, now: DateTime<Utc>) -> Option<CachedLookup> {
        let mut inner = self.inner.lock().await;
        let expired = match inner.entries.get(key) {
            None => return None,
            Some((_, entry)) => entry.is_expired(now),
        };

        if expired {
            cache_debug!("(get) entry [{}] expired.", key);
            inner.entries.remove(key);
            return None;
        }

        inner
            .entries
            .get(key)
            .map(|(_, entry)| entry.value.clone())
    }

    async fn insert(&self, key: &str, value: CachedLookup, ttl: Duration, now: DateTime<Utc>) {
        let mut inner = self.inner.lock().await;

        if !inner.entries.contains_key(key) && inner.entries.len() >= self.capacity {
            let removed = inner.remove_expired(now);
            if removed > 0 {
                cache_debug!("(insert) dropped {} expired entries.", removed);
            }

            while inner.entries.len() >= self.capacity {
                match inner.evict_oldest() {
                    Some(evicted) => cache_debug!("(insert) evicted oldest entry [{}].", evicted),
                    None => break,
                }
            }
        }

        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.order.push_back((seq, key.to_string()));
        inner.entries.insert(
            key.to_string(),
            (
                seq,
                CacheEntry {
                    key: key.to_string(),
                    value,
                    inserted_at: now,
                    ttl,
                },
            ),
        );

        // replaced and lazily expired keys leave stale records behind
        if inner.order.len() > self.capacity.saturating_mul(2) {
            inner.compact();
        }
    }

    async fn sweep(&self, now: DateTime<Utc>) -> usize {
        let mut inner = self.inner.lock().await;
        let removed = inner.remove_expired(now);
        inner.compact();
        removed
    }

    async fn len(&self) -> usize {
        self.inner.lock().await.entries.len()
    }
}
