// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Persistent Storage Module
//!
//! JSON-file persistence for user records under the configured data
//! directory.
//!
//! ## Storage Layout
//!
//! ```text
//! /data/
//!   users/
//!     {user_id}.json
//! ```
//!
//! Writes are atomic (temp file + rename). Records are created once and
//! never mutated by any API path.

pub mod fs;
pub mod paths;
pub mod repository;

pub use fs::{FileStorage, StorageError, StorageResult};
pub use paths::StoragePaths;
pub use repository::{AuthType, StoredUser, UserRepository};
