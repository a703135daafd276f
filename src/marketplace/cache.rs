// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-process caches for marketplace lookups.
//!
//! Two layers:
//! - `DetailCache`: per-mint asset metadata in an LRU, so a refresh does
//!   not re-fetch metadata for mints already seen.
//! - `SnapshotCache`: the last successfully joined listing set, the
//!   server-side analog of the original client's session-storage mirror.

use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use lru::LruCache;

use super::types::{AssetMetadata, NftDetail};

/// Cached entry: value + insertion timestamp.
struct CacheEntry<T> {
    value: T,
    inserted_at: Instant,
}

/// LRU cache for per-mint asset metadata.
pub struct DetailCache {
    cache: Mutex<LruCache<String, CacheEntry<AssetMetadata>>>,
    ttl: Duration,
}

impl DetailCache {
    /// Create a new cache with the given capacity and TTL.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            cache: Mutex::new(LruCache::new(
                NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::new(1).unwrap()),
            )),
            ttl,
        }
    }

    /// Get cached metadata for a mint.
    ///
    /// Returns `None` if not cached or expired.
    pub fn get(&self, mint: &str) -> Option<AssetMetadata> {
        let mut cache = self.cache.lock().ok()?;
        if let Some(entry) = cache.get(mint) {
            if entry.inserted_at.elapsed() < self.ttl {
                return Some(entry.value.clone());
            }
            // Expired — remove it
            cache.pop(mint);
        }
        None
    }

    /// Store metadata for a mint.
    pub fn put(&self, mint: &str, metadata: AssetMetadata) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.put(
                mint.to_string(),
                CacheEntry {
                    value: metadata,
                    inserted_at: Instant::now(),
                },
            );
        }
    }
}

/// Single-slot cache for the last joined listing snapshot.
pub struct SnapshotCache {
    slot: Mutex<Option<CacheEntry<Vec<NftDetail>>>>,
    ttl: Duration,
}

impl SnapshotCache {
    /// Create a snapshot cache with the given TTL.
    pub fn new(ttl: Duration) -> Self {
        Self {
            slot: Mutex::new(None),
            ttl,
        }
    }

    /// Get the cached snapshot if it is still fresh.
    pub fn get(&self) -> Option<Vec<NftDetail>> {
        let slot = self.slot.lock().ok()?;
        if let Some(entry) = &*slot {
            if entry.inserted_at.elapsed() < self.ttl {
                return Some(entry.value.clone());
            }
        }
        None
    }

    /// Replace the cached snapshot.
    pub fn put(&self, details: Vec<NftDetail>) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(CacheEntry {
                value: details,
                inserted_at: Instant::now(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_metadata() -> AssetMetadata {
        AssetMetadata {
            name: "Jacket #1".to_string(),
            symbol: "JKT".to_string(),
            image: None,
            group: Some("Group111".to_string()),
        }
    }

    #[test]
    fn detail_cache_put_and_get() {
        let cache = DetailCache::new(10, Duration::from_secs(300));
        assert!(cache.get("Mint1111").is_none());

        cache.put("Mint1111", sample_metadata());

        let hit = cache.get("Mint1111").unwrap();
        assert_eq!(hit.name, "Jacket #1");
    }

    #[test]
    fn detail_cache_ttl_expiry() {
        let cache = DetailCache::new(10, Duration::from_millis(1));
        cache.put("Mint1111", sample_metadata());

        std::thread::sleep(Duration::from_millis(5));

        assert!(cache.get("Mint1111").is_none());
    }

    #[test]
    fn detail_cache_evicts_least_recently_used() {
        let cache = DetailCache::new(2, Duration::from_secs(300));
        cache.put("a", sample_metadata());
        cache.put("b", sample_metadata());
        cache.put("c", sample_metadata());

        assert!(cache.get("a").is_none());
        assert!(cache.get("b").is_some());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn snapshot_cache_round_trip() {
        let cache = SnapshotCache::new(Duration::from_secs(300));
        assert!(cache.get().is_none());

        cache.put(Vec::new());
        assert_eq!(cache.get().unwrap().len(), 0);
    }

    #[test]
    fn snapshot_cache_ttl_expiry() {
        let cache = SnapshotCache::new(Duration::from_millis(1));
        cache.put(Vec::new());

        std::thread::sleep(Duration::from_millis(5));

        assert!(cache.get().is_none());
    }
}
