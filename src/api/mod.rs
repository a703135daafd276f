// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{marketplace::NftDetail, models::UserResponse, state::AppState};

pub mod auth;
pub mod health;
pub mod listings;
pub mod users;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/users/me", get(users::me))
        .route("/marketplace/listings", get(listings::list_listings))
        .with_state(state.clone());

    // Auth routes keep their historical top-level paths.
    Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/api/google", post(auth::google_login))
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state)
        .nest("/v1", v1_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::login,
        auth::register,
        auth::google_login,
        users::me,
        listings::list_listings,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            auth::LoginRequest,
            auth::RegisterRequest,
            auth::GoogleLoginRequest,
            auth::AuthResponse,
            UserResponse,
            NftDetail,
            health::HealthResponse,
            health::ReadyResponse,
            health::HealthChecks
        )
    ),
    tags(
        (name = "Auth", description = "Login and registration"),
        (name = "Users", description = "User profiles"),
        (name = "Marketplace", description = "Listing aggregation"),
        (name = "Health", description = "Probes")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenSigner;
    use crate::storage::{FileStorage, StoragePaths};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::time::Duration;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn test_state() -> (AppState, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let paths = StoragePaths::new(temp_dir.path());
        let mut storage = FileStorage::new(paths);
        storage.initialize().expect("Failed to initialize storage");

        let tokens = TokenSigner::new("test-secret", Duration::from_secs(3600));
        (AppState::new(storage, tokens), temp_dir)
    }

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let (state, _guard) = test_state();
        let app = router(state);
        // Ensure the router can be converted into a service without panicking.
        let _ = app.into_make_service();
    }

    #[tokio::test]
    async fn liveness_probe_is_ok() {
        let (state, _guard) = test_state();
        let app = router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health/live")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let (state, _guard) = test_state();
        let app = router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/nope")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
