// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{GoogleVerifier, TokenSigner};
use crate::marketplace::MarketplaceService;
use crate::storage::FileStorage;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    storage: Arc<FileStorage>,
    /// Issues and verifies the service's own tokens.
    pub tokens: Arc<TokenSigner>,
    /// Verifies Google ID tokens. `None` when GOOGLE_CLIENT_ID is unset;
    /// federated login is then unavailable.
    pub google: Option<Arc<GoogleVerifier>>,
    /// Marketplace listing aggregation. `None` when INDEXER_URL is unset;
    /// listings are then unavailable.
    pub marketplace: Option<Arc<MarketplaceService>>,
}

impl AppState {
    pub fn new(storage: FileStorage, tokens: TokenSigner) -> Self {
        Self {
            storage: Arc::new(storage),
            tokens: Arc::new(tokens),
            google: None,
            marketplace: None,
        }
    }

    pub fn with_google(mut self, verifier: GoogleVerifier) -> Self {
        self.google = Some(Arc::new(verifier));
        self
    }

    pub fn with_marketplace(mut self, service: Arc<MarketplaceService>) -> Self {
        self.marketplace = Some(service);
        self
    }

    /// Access the storage layer.
    pub fn storage(&self) -> Arc<FileStorage> {
        self.storage.clone()
    }
}
