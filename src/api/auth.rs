// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication endpoints: local login, registration, Google login.
//!
//! Route paths are kept from the service this replaces: `/login`,
//! `/register`, `/api/google`.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    auth::password,
    error::ApiError,
    models::UserResponse,
    state::AppState,
    storage::{StorageError, StoredUser, UserRepository},
};

/// Request body for `POST /login`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Request body for `POST /register`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    /// Optional wallet address to link at registration
    #[serde(default)]
    pub wallet_address: Option<String>,
}

/// Request body for `POST /api/google`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct GoogleLoginRequest {
    /// The ID token produced by the Google sign-in widget
    pub credential: String,
}

/// Response for successful logins.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthResponse {
    /// Signed bearer token for subsequent requests
    pub token: String,
    /// The authenticated user
    pub user: UserResponse,
}

/// Log in with username and password.
///
/// Every credential failure collapses into the same generic 400 so the
/// caller cannot probe which field was wrong.
#[utoipa::path(
    post,
    path = "/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login succeeded", body = AuthResponse),
        (status = 400, description = "Invalid credentials"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let storage = state.storage();
    let repo = UserRepository::new(&storage);

    let user = repo
        .find_by_username(&request.username)
        .map_err(|e| ApiError::internal(format!("Failed to look up user: {e}")))?
        .ok_or_else(ApiError::invalid_credentials)?;

    // Incomplete profiles fail the same way as wrong credentials.
    if user.username.is_empty() || user.email.is_empty() {
        return Err(ApiError::invalid_credentials());
    }

    // Federated-only accounts carry no password hash and can never pass here.
    let Some(stored_hash) = &user.password_hash else {
        return Err(ApiError::invalid_credentials());
    };

    if !password::verify_password(&request.password, stored_hash) {
        return Err(ApiError::invalid_credentials());
    }

    let token = state.tokens.issue(&user.user_id, user.role)?;

    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

/// Register a new user with local credentials.
///
/// The password is hashed with Argon2id; the role is fixed at creation.
/// Any persistence failure (duplicate username or email included) is a
/// generic 400.
#[utoipa::path(
    post,
    path = "/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Registration failed"),
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    // Required fields; an empty string would permanently take the
    // uniqueness slot for a record that can never log in.
    if request.username.trim().is_empty()
        || request.password.is_empty()
        || request.email.trim().is_empty()
    {
        return Err(ApiError::bad_request("All fields are required"));
    }

    let storage = state.storage();
    let repo = UserRepository::new(&storage);

    let password_hash = password::hash_password(&request.password)?;

    let user = StoredUser::local(
        request.username,
        password_hash,
        request.email,
        request.wallet_address.unwrap_or_default(),
    );

    repo.create(&user)
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Log in (or register on first sight) with a Google ID token.
///
/// The assertion is verified against Google's JWKS with the configured
/// client id as audience. The federated subject id is the upsert key: the
/// first login creates exactly one local record, later logins reuse it.
#[utoipa::path(
    post,
    path = "/api/google",
    tag = "Auth",
    request_body = GoogleLoginRequest,
    responses(
        (status = 200, description = "Login succeeded", body = AuthResponse),
        (status = 400, description = "Assertion rejected"),
        (status = 500, description = "Persistence failure"),
        (status = 503, description = "Google login not configured"),
    )
)]
pub async fn google_login(
    State(state): State<AppState>,
    Json(request): Json<GoogleLoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let Some(verifier) = &state.google else {
        return Err(ApiError::service_unavailable(
            "Google login is not configured",
        ));
    };

    let identity = verifier
        .verify_id_token(&request.credential)
        .await
        .map_err(|e| {
            tracing::debug!(error = %e, "Rejected Google assertion");
            ApiError::bad_request("Error logging in")
        })?;

    let storage = state.storage();
    let repo = UserRepository::new(&storage);

    let user = repo.upsert_federated(&identity).map_err(|e| match e {
        // A username/email collision with an existing local account is a
        // client-visible conflict, not a server fault.
        StorageError::AlreadyExists(what) => ApiError::bad_request(format!("Already exists: {what}")),
        other => ApiError::internal(format!("Failed to persist user: {other}")),
    })?;

    let token = state.tokens.issue(&user.user_id, user.role)?;

    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

impl From<crate::auth::AuthError> for ApiError {
    fn from(e: crate::auth::AuthError) -> Self {
        ApiError::new(e.status_code(), e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::router;
    use crate::auth::{GoogleVerifier, TokenSigner};
    use crate::storage::{FileStorage, StoragePaths};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
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

    fn json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn register_then_login_round_trip() {
        let (state, _guard) = test_state();
        let app = router(state);

        let response = app
            .clone()
            .oneshot(json_request(
                "/register",
                serde_json::json!({
                    "username": "ana",
                    "password": "pw1",
                    "email": "a@x.com"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        assert_eq!(created["username"], "ana");
        assert_eq!(created["role"], "designer");

        let response = app
            .oneshot(json_request(
                "/login",
                serde_json::json!({"username": "ana", "password": "pw1"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(!body["token"].as_str().unwrap().is_empty());
        assert_eq!(body["user"]["username"], "ana");
        assert_eq!(body["user"]["email"], "a@x.com");
    }

    #[tokio::test]
    async fn duplicate_registration_fails_without_second_record() {
        let (state, _guard) = test_state();
        let storage = state.storage();
        let app = router(state);

        let payload = serde_json::json!({
            "username": "ana",
            "password": "pw1",
            "email": "a@x.com"
        });
        let first = app
            .clone()
            .oneshot(json_request("/register", payload.clone()))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::CREATED);

        // Same username, different email
        let second = app
            .clone()
            .oneshot(json_request(
                "/register",
                serde_json::json!({
                    "username": "ana",
                    "password": "pw2",
                    "email": "other@x.com"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::BAD_REQUEST);

        // Same email, different username
        let third = app
            .oneshot(json_request(
                "/register",
                serde_json::json!({
                    "username": "bob",
                    "password": "pw3",
                    "email": "a@x.com"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(third.status(), StatusCode::BAD_REQUEST);

        let ids = storage
            .list_files(storage.paths().users_dir(), "json")
            .unwrap();
        assert_eq!(ids.len(), 1);
    }

    #[tokio::test]
    async fn registration_rejects_empty_required_fields() {
        let (state, _guard) = test_state();
        let storage = state.storage();
        let app = router(state);

        let response = app
            .clone()
            .oneshot(json_request(
                "/register",
                serde_json::json!({"username": "", "password": "", "email": ""}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // Any single missing field is enough
        let response = app
            .oneshot(json_request(
                "/register",
                serde_json::json!({
                    "username": "ana",
                    "password": "",
                    "email": "a@x.com"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // No record was created
        let ids = storage
            .list_files(storage.paths().users_dir(), "json")
            .unwrap();
        assert!(ids.is_empty());
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() {
        let (state, _guard) = test_state();
        let app = router(state);

        app.clone()
            .oneshot(json_request(
                "/register",
                serde_json::json!({
                    "username": "ana",
                    "password": "pw1",
                    "email": "a@x.com"
                }),
            ))
            .await
            .unwrap();

        // Wrong password
        let wrong_password = app
            .clone()
            .oneshot(json_request(
                "/login",
                serde_json::json!({"username": "ana", "password": "nope"}),
            ))
            .await
            .unwrap();
        assert_eq!(wrong_password.status(), StatusCode::BAD_REQUEST);
        let wrong_password_body = body_json(wrong_password).await;

        // Unknown user
        let unknown_user = app
            .oneshot(json_request(
                "/login",
                serde_json::json!({"username": "ghost", "password": "pw1"}),
            ))
            .await
            .unwrap();
        assert_eq!(unknown_user.status(), StatusCode::BAD_REQUEST);
        let unknown_user_body = body_json(unknown_user).await;

        // Same generic message for both
        assert_eq!(wrong_password_body["error"], "Invalid credentials");
        assert_eq!(unknown_user_body, wrong_password_body);
    }

    #[tokio::test]
    async fn federated_account_cannot_use_local_login() {
        let (state, _guard) = test_state();
        {
            let storage = state.storage();
            let repo = UserRepository::new(&storage);
            repo.upsert_federated(&crate::auth::GoogleIdentity {
                subject: "google-sub-1".to_string(),
                email: "fed@example.com".to_string(),
                display_name: "Fed User".to_string(),
            })
            .unwrap();
        }
        let app = router(state);

        let response = app
            .oneshot(json_request(
                "/login",
                serde_json::json!({"username": "Fed User", "password": "google-sub-1"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Invalid credentials");
    }

    #[tokio::test]
    async fn google_login_unconfigured_returns_503() {
        let (state, _guard) = test_state();
        let app = router(state);

        let response = app
            .oneshot(json_request(
                "/api/google",
                serde_json::json!({"credential": "whatever"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn google_login_rejects_malformed_credential() {
        let (state, _guard) = test_state();
        let state = state.with_google(GoogleVerifier::new("client-123"));
        let app = router(state);

        let response = app
            .oneshot(json_request(
                "/api/google",
                serde_json::json!({"credential": "not-a-jwt"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Error logging in");
    }
}
