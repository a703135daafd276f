// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

pub mod users;

pub use users::{AuthType, StoredUser, UserRepository};
