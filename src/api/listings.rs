// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Marketplace listing endpoint.

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    error::ApiError,
    marketplace::{apply_filters, ListingFilters, NftDetail},
    state::AppState,
};

/// List active marketplace listings joined with asset metadata.
///
/// `price` and `collection` are exact-match filters that combine with
/// logical OR. Served from the snapshot cache when fresh.
#[utoipa::path(
    get,
    path = "/v1/marketplace/listings",
    tag = "Marketplace",
    params(ListingFilters),
    responses(
        (status = 200, description = "Active listings", body = [NftDetail]),
        (status = 502, description = "Indexing provider error"),
        (status = 503, description = "Marketplace not configured"),
    )
)]
pub async fn list_listings(
    State(state): State<AppState>,
    Query(filters): Query<ListingFilters>,
) -> Result<Json<Vec<NftDetail>>, ApiError> {
    let Some(service) = &state.marketplace else {
        return Err(ApiError::service_unavailable(
            "Marketplace is not configured",
        ));
    };

    let details = service.active_listings().await.map_err(|e| {
        tracing::warn!(error = %e, "Failed to assemble listings");
        ApiError::bad_gateway("Failed to fetch listings")
    })?;

    Ok(Json(apply_filters(details, &filters)))
}
