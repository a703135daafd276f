// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::net::SocketAddr;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use atelier_market_server::api::router;
use atelier_market_server::auth::{GoogleVerifier, TokenSigner};
use atelier_market_server::config::AppConfig;
use atelier_market_server::marketplace::{IndexerClient, ListingSync, MarketplaceService};
use atelier_market_server::state::AppState;
use atelier_market_server::storage::{FileStorage, StoragePaths};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    let format = std::env::var("LOG_FORMAT").unwrap_or_default();
    if format.eq_ignore_ascii_case("json") {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    let paths = StoragePaths::new(&config.data_dir);
    let mut storage = FileStorage::new(paths);
    if let Err(e) = storage.initialize() {
        tracing::error!(error = %e, data_dir = %config.data_dir, "Failed to initialize storage");
        std::process::exit(1);
    }

    let tokens = TokenSigner::new(&config.jwt_secret, config.token_ttl);
    let mut state = AppState::new(storage, tokens);

    if let Some(client_id) = &config.google_client_id {
        tracing::info!("Google login enabled");
        state = state.with_google(GoogleVerifier::new(client_id));
    } else {
        tracing::warn!("GOOGLE_CLIENT_ID not set, Google login disabled");
    }

    let shutdown = CancellationToken::new();

    if let Some(indexer_url) = &config.indexer_url {
        tracing::info!(indexer = %indexer_url, "Marketplace listings enabled");
        let client = IndexerClient::new(indexer_url.clone());
        let service = Arc::new(MarketplaceService::new(client, config.listing_cache_ttl));

        let sync = ListingSync::new(service.clone(), config.listing_poll_interval);
        tokio::spawn(sync.run(shutdown.clone()));

        state = state.with_marketplace(service);
    } else {
        tracing::warn!("INDEXER_URL not set, marketplace listings disabled");
    }

    let app = router(state);

    let addr: SocketAddr = match format!("{}:{}", config.host, config.port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!(error = %e, "Invalid bind address");
            std::process::exit(1);
        }
    };

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %addr, "Failed to bind");
            std::process::exit(1);
        }
    };

    tracing::info!("Atelier Market server listening on http://{addr} (docs at /docs)");

    let server_shutdown = shutdown.clone();
    let result = axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received");
            server_shutdown.cancel();
        })
        .await;

    // The token is already cancelled on the signal path; cancel again so
    // error exits also stop the background task.
    shutdown.cancel();

    if let Err(e) = result {
        tracing::error!(error = %e, "Server failed");
        std::process::exit(1);
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
