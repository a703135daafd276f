// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Marketplace Listing Service
//!
//! Aggregates active listings from the chain-indexing provider:
//!
//! 1. Fetch the listing set and keep the `is_active` entries.
//! 2. Fan out one metadata fetch per listing, unordered, and wait for all
//!    of them — a single failure fails the whole batch.
//! 3. Cache the joined snapshot; serve filtered views from it.
//!
//! Price/collection filters combine with logical OR: a listing is kept when
//! it matches either filter. That mirrors the behavior this service
//! replaces; see DESIGN.md for the open question around it.

pub mod cache;
pub mod client;
pub mod sync;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tokio::task::JoinSet;
use utoipa::IntoParams;

pub use cache::{DetailCache, SnapshotCache};
pub use client::IndexerClient;
pub use sync::ListingSync;
pub use types::{AssetMetadata, Listing, NftDetail};

/// Capacity of the per-mint metadata cache.
const DETAIL_CACHE_CAPACITY: usize = 1024;

/// TTL for per-mint metadata entries (metadata changes far less often than
/// the listing set).
const DETAIL_CACHE_TTL: Duration = Duration::from_secs(600);

/// Marketplace errors.
#[derive(Debug, thiserror::Error)]
pub enum MarketError {
    #[error("indexing provider error: {0}")]
    Provider(String),

    #[error("metadata join failed: {0}")]
    Join(String),
}

/// Exact-match filters over the listing snapshot.
///
/// Empty strings are treated as unset, matching the form inputs this
/// replaces.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ListingFilters {
    /// Exact asking price to match
    pub price: Option<String>,
    /// Exact collection address to match
    pub collection: Option<String>,
}

impl ListingFilters {
    fn price(&self) -> Option<&str> {
        self.price.as_deref().filter(|s| !s.is_empty())
    }

    fn collection(&self) -> Option<&str> {
        self.collection.as_deref().filter(|s| !s.is_empty())
    }

    /// Whether any filter is set.
    pub fn is_set(&self) -> bool {
        self.price().is_some() || self.collection().is_some()
    }
}

/// Apply the filters to a joined snapshot.
///
/// When either filter is set, a listing is kept if its price OR its
/// collection matches.
pub fn apply_filters(details: Vec<NftDetail>, filters: &ListingFilters) -> Vec<NftDetail> {
    if !filters.is_set() {
        return details;
    }

    details
        .into_iter()
        .filter(|detail| {
            filters.price().is_some_and(|p| p == detail.price)
                || filters.collection().is_some_and(|c| c == detail.collection)
        })
        .collect()
}

/// Fetches, joins, caches, and filters marketplace listings.
pub struct MarketplaceService {
    client: IndexerClient,
    details: Arc<DetailCache>,
    snapshot: SnapshotCache,
}

impl MarketplaceService {
    /// Create a service over the given provider client.
    ///
    /// `snapshot_ttl` bounds how stale a served listing set may be.
    pub fn new(client: IndexerClient, snapshot_ttl: Duration) -> Self {
        Self {
            client,
            details: Arc::new(DetailCache::new(DETAIL_CACHE_CAPACITY, DETAIL_CACHE_TTL)),
            snapshot: SnapshotCache::new(snapshot_ttl),
        }
    }

    /// Current active listings, joined with metadata.
    ///
    /// Serves the cached snapshot when fresh, otherwise fetches live.
    pub async fn active_listings(&self) -> Result<Vec<NftDetail>, MarketError> {
        if let Some(hit) = self.snapshot.get() {
            return Ok(hit);
        }
        self.refresh().await
    }

    /// Fetch a fresh snapshot, bypassing the snapshot cache.
    pub async fn refresh(&self) -> Result<Vec<NftDetail>, MarketError> {
        let listings = self.client.fetch_listings().await?;
        let active: Vec<Listing> = listings.into_iter().filter(|l| l.is_active).collect();

        let details = self.join_metadata(active).await?;
        self.snapshot.put(details.clone());
        Ok(details)
    }

    /// Join each listing with its asset metadata, fetching concurrently.
    ///
    /// Unordered fan-out, wait-for-all: the first failure fails the batch
    /// and aborts the remaining fetches.
    async fn join_metadata(&self, listings: Vec<Listing>) -> Result<Vec<NftDetail>, MarketError> {
        let mut set = JoinSet::new();

        for listing in listings {
            let client = self.client.clone();
            let cache = self.details.clone();
            set.spawn(async move {
                let metadata = match cache.get(&listing.mint) {
                    Some(hit) => hit,
                    None => {
                        let fetched = client.fetch_metadata(&listing.mint).await?;
                        cache.put(&listing.mint, fetched.clone());
                        fetched
                    }
                };
                Ok::<NftDetail, MarketError>(NftDetail::assemble(&listing, metadata))
            });
        }

        let mut details = Vec::new();
        while let Some(joined) = set.join_next().await {
            let detail = joined.map_err(|e| MarketError::Join(e.to_string()))??;
            details.push(detail);
        }

        Ok(details)
    }

    /// Seed the snapshot cache directly (tests only).
    #[cfg(test)]
    pub(crate) fn prime_snapshot(&self, details: Vec<NftDetail>) {
        self.snapshot.put(details);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(price: &str, collection: &str) -> NftDetail {
        NftDetail {
            name: format!("Asset {price}/{collection}"),
            symbol: "AST".to_string(),
            image: None,
            group: (!collection.is_empty()).then(|| collection.to_string()),
            mint: format!("mint-{price}-{collection}"),
            seller: "Seller11".to_string(),
            price: price.to_string(),
            listing: "Listing1".to_string(),
            collection: collection.to_string(),
        }
    }

    #[test]
    fn no_filters_returns_everything() {
        let all = vec![detail("1", "A"), detail("2", "B")];
        let filters = ListingFilters::default();
        assert_eq!(apply_filters(all, &filters).len(), 2);
    }

    #[test]
    fn empty_string_filters_are_unset() {
        let all = vec![detail("1", "A"), detail("2", "B")];
        let filters = ListingFilters {
            price: Some(String::new()),
            collection: Some(String::new()),
        };
        assert!(!filters.is_set());
        assert_eq!(apply_filters(all, &filters).len(), 2);
    }

    #[test]
    fn price_filter_matches_exactly() {
        let all = vec![detail("1", "A"), detail("2", "B")];
        let filters = ListingFilters {
            price: Some("2".to_string()),
            collection: None,
        };
        let kept = apply_filters(all, &filters);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].price, "2");
    }

    #[test]
    fn both_filters_combine_with_or() {
        // Matching either the price or the collection keeps the listing.
        let all = vec![detail("1", "A"), detail("2", "B"), detail("3", "C")];
        let filters = ListingFilters {
            price: Some("1".to_string()),
            collection: Some("B".to_string()),
        };
        let kept = apply_filters(all, &filters);
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().any(|d| d.price == "1"));
        assert!(kept.iter().any(|d| d.collection == "B"));
    }

    #[test]
    fn no_match_returns_empty() {
        let all = vec![detail("1", "A")];
        let filters = ListingFilters {
            price: Some("9".to_string()),
            collection: Some("Z".to_string()),
        };
        assert!(apply_filters(all, &filters).is_empty());
    }

    #[tokio::test]
    async fn primed_snapshot_served_without_provider() {
        let client = IndexerClient::new("https://invalid.localhost/v0".parse().unwrap());
        let service = MarketplaceService::new(client, Duration::from_secs(300));
        service.prime_snapshot(vec![detail("1", "A")]);

        let listings = service.active_listings().await.unwrap();
        assert_eq!(listings.len(), 1);
    }

    #[tokio::test]
    async fn join_of_empty_listing_set_is_empty() {
        let client = IndexerClient::new("https://invalid.localhost/v0".parse().unwrap());
        let service = MarketplaceService::new(client, Duration::from_secs(300));
        let joined = service.join_metadata(Vec::new()).await.unwrap();
        assert!(joined.is_empty());
    }
}
