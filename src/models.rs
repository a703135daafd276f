// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared API models.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::Role;
use crate::storage::StoredUser;

/// User representation returned to API clients.
///
/// Never includes the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    /// Unique user identifier
    pub id: String,
    /// Username
    pub username: String,
    /// Email address
    pub email: String,
    /// Linked wallet address, empty when none
    pub wallet_address: String,
    /// Role assigned at creation
    pub role: Role,
}

impl From<StoredUser> for UserResponse {
    fn from(user: StoredUser) -> Self {
        Self {
            id: user.user_id,
            username: user.username,
            email: user.email,
            wallet_address: user.wallet_address,
            role: user.role,
        }
    }
}
