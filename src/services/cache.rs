// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Process-wide read-through cache for journey reads.
//!
//! Entries expire after a fixed TTL. An expired entry is dropped when its
//! key is read, and all expired entries are swept whenever a new one is
//! stored. Writes never populate the cache; instead every mutation removes
//! the keys listed for it by [`Mutation::invalidated_keys`].

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

use crate::models::{Journey, MonthlyRouteDistance};

/// Lifetime of a cached read.
pub const CACHE_TTL_MINUTES: i64 = 10;

/// Default TTL for every cached read.
pub fn default_ttl() -> Duration {
    Duration::minutes(CACHE_TTL_MINUTES)
}

/// Cache keys. One variant per cached read path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Single journey by ID
    Journey(u64),
    /// All journeys of one user
    UserJourneys(String),
    /// Global monthly distance rollup
    MonthlyRouteDistances,
}

/// Cached values, tagged by the read path that produced them.
#[derive(Debug, Clone)]
pub enum CachedValue {
    Journey(Journey),
    Journeys(Vec<Journey>),
    MonthlyRouteDistances(Vec<MonthlyRouteDistance>),
}

/// A journey write, as seen by the invalidation policy.
#[derive(Debug, Clone, Copy)]
pub enum Mutation<'a> {
    Created { owner_id: &'a str },
    Updated { journey_id: u64, owner_id: &'a str },
    Deleted { journey_id: u64, owner_id: &'a str },
}

impl Mutation<'_> {
    /// Every cache key whose value can change because of this mutation.
    pub fn invalidated_keys(&self) -> Vec<CacheKey> {
        match *self {
            Mutation::Created { owner_id } => vec![
                CacheKey::UserJourneys(owner_id.to_string()),
                CacheKey::MonthlyRouteDistances,
            ],
            Mutation::Updated {
                journey_id,
                owner_id,
            }
            | Mutation::Deleted {
                journey_id,
                owner_id,
            } => vec![
                CacheKey::Journey(journey_id),
                CacheKey::UserJourneys(owner_id.to_string()),
                CacheKey::MonthlyRouteDistances,
            ],
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: CachedValue,
    expires_at: DateTime<Utc>,
}

/// Key/value cache with per-entry expiry, shared across requests.
#[derive(Debug, Default)]
pub struct TtlCache {
    entries: DashMap<CacheKey, CacheEntry>,
}

impl TtlCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a live entry. Expired entries are removed and reported as a miss.
    pub fn get(&self, key: &CacheKey) -> Option<CachedValue> {
        let now = Utc::now();
        if let Some(entry) = self.entries.get(key) {
            if now < entry.expires_at {
                return Some(entry.value.clone());
            }
        }
        // Expired (or absent): drop it outside the read guard.
        self.entries.remove_if(key, |_, entry| now >= entry.expires_at);
        None
    }

    /// Store `value` under `key` for `ttl`, sweeping expired entries first.
    pub fn set(&self, key: CacheKey, value: CachedValue, ttl: Duration) {
        self.purge_expired();
        self.entries.insert(
            key,
            CacheEntry {
                value,
                expires_at: Utc::now() + ttl,
            },
        );
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| now < entry.expires_at);
        let purged = before.saturating_sub(self.entries.len());
        if purged > 0 {
            tracing::debug!(purged, "Expired cache entries swept");
        }
        purged
    }

    /// Remove `key`. Returns whether an entry was present.
    pub fn remove(&self, key: &CacheKey) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Apply the invalidation policy for `mutation`.
    pub fn invalidate(&self, mutation: &Mutation<'_>) {
        for key in mutation.invalidated_keys() {
            if self.remove(&key) {
                tracing::debug!(key = ?key, "Cache entry invalidated");
            }
        }
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
