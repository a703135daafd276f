// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User repository.
//!
//! ## Storage Layout
//!
//! One JSON file per user:
//! ```text
//! /data/users/{user_id}.json
//! ```
//!
//! ## Uniqueness
//!
//! `username`, `email`, and `google_id` are unique across all records.
//! Uniqueness is enforced by scanning at create time; records are never
//! updated or deleted through the API, so a record that passed the check
//! stays valid.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::{FileStorage, StorageError, StorageResult};
use crate::auth::{GoogleIdentity, Role};

/// How the account was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AuthType {
    /// Created via Google federated login
    Google,
}

/// A persisted user record.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StoredUser {
    /// Unique user identifier (UUID)
    pub user_id: String,
    /// Unique username
    pub username: String,
    /// Argon2id hash in PHC format. Absent for federated-only accounts,
    /// which therefore can never pass local login.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    /// Unique email
    pub email: String,
    /// Blockchain wallet address, empty when the user has not linked one
    #[serde(default)]
    pub wallet_address: String,
    /// Role assigned at creation
    pub role: Role,
    /// Set for federated accounts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_type: Option<AuthType>,
    /// Unique federated subject id (Google `sub` claim)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_id: Option<String>,
    /// When the record was created
    pub created_at: DateTime<Utc>,
}

impl StoredUser {
    /// Build a record for a local registration.
    pub fn local(
        username: String,
        password_hash: String,
        email: String,
        wallet_address: String,
    ) -> Self {
        Self {
            user_id: uuid::Uuid::new_v4().to_string(),
            username,
            password_hash: Some(password_hash),
            email,
            wallet_address,
            role: Role::default(),
            auth_type: None,
            google_id: None,
            created_at: Utc::now(),
        }
    }

    /// Build a record for a first-time federated login.
    ///
    /// No local password is stored for federated accounts.
    pub fn federated(identity: &GoogleIdentity) -> Self {
        Self {
            user_id: uuid::Uuid::new_v4().to_string(),
            username: identity.display_name.clone(),
            password_hash: None,
            email: identity.email.clone(),
            wallet_address: String::new(),
            role: Role::default(),
            auth_type: Some(AuthType::Google),
            google_id: Some(identity.subject.clone()),
            created_at: Utc::now(),
        }
    }
}

/// Repository for user records.
pub struct UserRepository<'a> {
    storage: &'a FileStorage,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository.
    pub fn new(storage: &'a FileStorage) -> Self {
        Self { storage }
    }

    /// Check if a user record exists.
    pub fn exists(&self, user_id: &str) -> bool {
        self.storage.exists(self.storage.paths().user(user_id))
    }

    /// Get a user by id.
    pub fn get(&self, user_id: &str) -> StorageResult<StoredUser> {
        let path = self.storage.paths().user(user_id);
        if !self.storage.exists(&path) {
            return Err(StorageError::NotFound(format!("User {user_id}")));
        }
        self.storage.read_json(path)
    }

    /// Persist a new user, enforcing the uniqueness constraints.
    ///
    /// # Returns
    /// - `Err(StorageError::AlreadyExists)` naming the colliding field when
    ///   the username, email, or federated subject id is already taken.
    pub fn create(&self, user: &StoredUser) -> StorageResult<()> {
        if self.exists(&user.user_id) {
            return Err(StorageError::AlreadyExists(format!("User {}", user.user_id)));
        }

        for existing in self.list_all()? {
            if existing.username == user.username {
                return Err(StorageError::AlreadyExists(format!(
                    "username {}",
                    user.username
                )));
            }
            if existing.email == user.email {
                return Err(StorageError::AlreadyExists(format!("email {}", user.email)));
            }
            if let (Some(a), Some(b)) = (&existing.google_id, &user.google_id) {
                if a == b {
                    return Err(StorageError::AlreadyExists(format!("google id {b}")));
                }
            }
        }

        self.storage
            .write_json(self.storage.paths().user(&user.user_id), user)
    }

    /// Find a user by exact username.
    pub fn find_by_username(&self, username: &str) -> StorageResult<Option<StoredUser>> {
        Ok(self
            .list_all()?
            .into_iter()
            .find(|u| u.username == username))
    }

    /// Find a user by federated subject id.
    pub fn find_by_google_id(&self, google_id: &str) -> StorageResult<Option<StoredUser>> {
        Ok(self
            .list_all()?
            .into_iter()
            .find(|u| u.google_id.as_deref() == Some(google_id)))
    }

    /// Find-or-create a user for a verified federated identity.
    ///
    /// Idempotent on the subject id: the first call creates exactly one
    /// record, later calls return the same record unchanged.
    pub fn upsert_federated(&self, identity: &GoogleIdentity) -> StorageResult<StoredUser> {
        if let Some(existing) = self.find_by_google_id(&identity.subject)? {
            return Ok(existing);
        }

        let user = StoredUser::federated(identity);
        self.create(&user)?;
        Ok(user)
    }

    /// Load all user records.
    fn list_all(&self) -> StorageResult<Vec<StoredUser>> {
        let ids = self
            .storage
            .list_files(self.storage.paths().users_dir(), "json")?;

        let mut users = Vec::new();
        for id in &ids {
            if let Ok(user) = self.get(id) {
                users.push(user);
            }
        }
        Ok(users)
    }
}
