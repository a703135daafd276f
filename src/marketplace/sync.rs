// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Background listing refresh task.
//!
//! Keeps the listing snapshot warm by re-fetching it on a poll interval, so
//! most requests are served from cache. Failures are logged and retried on
//! the next tick; the snapshot simply goes stale in between.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::MarketplaceService;

/// Periodic listing snapshot refresher that runs as a background tokio task.
pub struct ListingSync {
    service: Arc<MarketplaceService>,
    poll_interval: Duration,
}

impl ListingSync {
    /// Create a refresher over the given service.
    pub fn new(service: Arc<MarketplaceService>, poll_interval: Duration) -> Self {
        Self {
            service,
            poll_interval,
        }
    }

    /// Run the refresh loop until the cancellation token is triggered.
    ///
    /// This should be spawned as a background task:
    /// ```rust,ignore
    /// tokio::spawn(sync.run(shutdown.clone()));
    /// ```
    pub async fn run(self, shutdown: CancellationToken) {
        tracing::info!(
            poll_interval_secs = self.poll_interval.as_secs(),
            "Listing sync starting"
        );

        loop {
            if shutdown.is_cancelled() {
                tracing::info!("Listing sync shutting down");
                return;
            }

            match self.service.refresh().await {
                Ok(details) => {
                    tracing::debug!(listings = details.len(), "Refreshed listing snapshot");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Listing refresh failed, will retry");
                }
            }

            tokio::select! {
                _ = tokio::time::sleep(self.poll_interval) => {},
                _ = shutdown.cancelled() => {
                    tracing::info!("Listing sync shutting down");
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marketplace::IndexerClient;

    #[tokio::test]
    async fn run_exits_on_cancellation() {
        let client = IndexerClient::new("https://invalid.localhost/v0".parse().unwrap());
        let service = Arc::new(MarketplaceService::new(client, Duration::from_secs(300)));
        let sync = ListingSync::new(service, Duration::from_secs(3600));

        let shutdown = CancellationToken::new();
        shutdown.cancel();

        // A pre-cancelled token must end the loop after at most one tick.
        tokio::time::timeout(Duration::from_secs(30), sync.run(shutdown))
            .await
            .expect("sync loop should exit promptly when cancelled");
    }
}
