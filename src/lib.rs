// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Atelier Market - Fashion NFT Marketplace Service
//!
//! This crate provides the auth and listing backend for a fashion NFT
//! marketplace on Solana: local and Google login, signed bearer tokens,
//! and an aggregated view over the chain-indexing provider's listings.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Token issuance, password hashing, Google ID token verification
//! - `marketplace` - Listing aggregation, metadata join, caching
//! - `storage` - File-backed user records

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod marketplace;
pub mod models;
pub mod state;
pub mod storage;
