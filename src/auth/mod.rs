// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Credential checks and token issuance for the marketplace API.
//!
//! ## Auth Flows
//!
//! 1. **Local**: `/register` hashes the password (Argon2id) and stores the
//!    user; `/login` looks the user up, verifies the hash, and issues an
//!    HS256 token carrying `{sub, role, iat, exp}`.
//! 2. **Federated**: `/api/google` verifies the Google ID token against
//!    Google's JWKS (signature, issuer, configured audience), creates a
//!    local record on first sight of the subject id, and issues the same
//!    HS256 token.
//!
//! ## Security
//!
//! - The signing secret is mandatory configuration; there is no default
//! - Issued tokens always expire
//! - Federated records store no local password
//! - Clock skew tolerance is 60 seconds

pub mod claims;
pub mod error;
pub mod extractor;
pub mod google;
pub mod password;
pub mod roles;
pub mod token;

pub use claims::AuthenticatedUser;
pub use error::AuthError;
pub use extractor::Auth;
pub use google::{GoogleIdentity, GoogleVerifier};
pub use roles::Role;
pub use token::TokenSigner;
