//! Geocode cache
//!
//! Time-bound memoization of provider lookups. The store is reached through
//! the [`GeocodeStore`] trait so a shared backend can replace the in-process
//! [`memory::MemoryStore`] without touching the service.

#[macro_use]
pub mod macros;
pub mod memory;
pub mod sweeper;

pub use memory::MemoryStore;

use crate::router::Coordinate;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

/// A resolved place, as returned by a geocoding provider.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeResult {
    /// Position of the place
    pub coordinate: Coordinate,

    /// Human readable name of the place
    pub display_name: String,

    /// Structured address parts (road, city, postcode, ...)
    pub address_components: HashMap<String, String>,

    /// When the provider answered
    pub resolved_at: DateTime<Utc>,
}

/// What the cache remembers about a key.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedLookup {
    /// The provider resolved the key
    Found(GeocodeResult),

    /// The provider had no result for the key
    Missing,
}

/// A stored lookup with its own time to live.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Cache key, e.g. `search:<address>` or `reverse:<lat>,<lon>`
    pub key: String,

    /// The remembered lookup
    pub value: CachedLookup,

    /// When the entry was stored
    pub inserted_at: DateTime<Utc>,

    /// How long the entry stays valid
    pub ttl: Duration,
}

impl CacheEntry {
    /// An entry is expired once strictly more than `ttl` has passed since
    /// it was stored.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.inserted_at > self.ttl
    }
}

/// Storage seam for the geocode cache.
///
/// Implementations must tolerate concurrent callers. They are not
/// required to deduplicate concurrent misses.
#[async_trait::async_trait]
pub trait GeocodeStore: Send + Sync {
    /// Returns the lookup stored under `key` if it has not expired at `now`.
    async fn get(&self, key: &str, now: DateTime<Utc>) -> Option<CachedLookup>;

    /// Stores `value` under `key`, replacing any previous entry.
    async fn insert(&self, key: &str, value: CachedLookup, ttl: Duration, now: DateTime<Utc>);

    /// Drops every entry expired at `now` and returns how many were dropped.
    async fn sweep(&self, now: DateTime<Utc>) -> usize;

    /// Number of stored entries, expired ones included until swept.
    async fn len(&self) -> usize;

    /// True if nothing is stored
    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
