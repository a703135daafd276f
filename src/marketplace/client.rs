// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP client for the chain-indexing provider.
//!
//! The provider exposes a small REST surface:
//!
//! - `GET {base}/listings` — every listing account the marketplace program
//!   owns, active and closed
//! - `GET {base}/assets/{mint}` — on-chain metadata for one asset

use std::time::Duration;

use url::Url;

use super::types::{AssetMetadata, Listing};
use super::MarketError;

/// Request timeout for provider calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Client for the chain-indexing provider.
#[derive(Clone)]
pub struct IndexerClient {
    base_url: Url,
    client: reqwest::Client,
}

impl IndexerClient {
    /// Create a client for the given provider base URL.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// Fetch the full listing set.
    pub async fn fetch_listings(&self) -> Result<Vec<Listing>, MarketError> {
        let url = self.endpoint(&["listings"])?;
        self.get_json(url).await
    }

    /// Fetch metadata for a single asset.
    pub async fn fetch_metadata(&self, mint: &str) -> Result<AssetMetadata, MarketError> {
        let url = self.endpoint(&["assets", mint])?;
        self.get_json(url).await
    }

    /// Build an endpoint URL under the provider base.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, MarketError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| MarketError::Provider("indexer URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T, MarketError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| MarketError::Provider(e.to_string()))?;

        if !response.status().is_success() {
            return Err(MarketError::Provider(format!(
                "HTTP {} from indexing provider",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| MarketError::Provider(e.to_string()))
    }
}
