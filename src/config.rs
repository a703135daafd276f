// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment once at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DATA_DIR` | Root directory for persistent storage | `/data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `4000` |
//! | `JWT_SECRET` | HS256 signing secret for issued tokens | **Required** |
//! | `TOKEN_TTL_SECS` | Lifetime of issued tokens in seconds | `86400` |
//! | `GOOGLE_CLIENT_ID` | Expected audience for Google ID tokens | Optional (Google login disabled when unset) |
//! | `INDEXER_URL` | Base URL of the chain-indexing provider | Optional (listings unavailable when unset) |
//! | `LISTING_CACHE_TTL_SECS` | TTL for the listing snapshot cache | `60` |
//! | `LISTING_POLL_SECS` | Background listing refresh interval | `120` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;
use std::time::Duration;

use url::Url;

/// Environment variable name for the persistent data directory path.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Default data directory when `DATA_DIR` is unset.
pub const DEFAULT_DATA_DIR: &str = "/data";

/// Default token lifetime (24 hours).
const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(86_400);

/// Default TTL for the cached listing snapshot.
const DEFAULT_LISTING_CACHE_TTL: Duration = Duration::from_secs(60);

/// Default poll interval for the background listing refresh task.
const DEFAULT_LISTING_POLL: Duration = Duration::from_secs(120);

/// Configuration errors raised at startup.
///
/// A missing signing secret is deliberately fatal: the service the original
/// design was derived from fell back to a well-known default secret, which
/// made every issued token forgeable. Startup aborts instead.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set (refusing to start with a default signing secret)")]
    MissingJwtSecret,

    #[error("invalid {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Application configuration assembled from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server bind address.
    pub host: String,
    /// Server bind port.
    pub port: u16,
    /// Root directory for persistent storage.
    pub data_dir: String,
    /// HS256 signing secret for issued tokens.
    pub jwt_secret: String,
    /// Lifetime of issued tokens.
    pub token_ttl: Duration,
    /// Expected audience for Google ID tokens. Google login is disabled
    /// when unset.
    pub google_client_id: Option<String>,
    /// Base URL of the chain-indexing provider. Listings are unavailable
    /// when unset.
    pub indexer_url: Option<Url>,
    /// TTL for the cached listing snapshot.
    pub listing_cache_ttl: Duration,
    /// Background listing refresh interval.
    pub listing_poll_interval: Duration,
}

impl AppConfig {
    /// Load configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::MissingJwtSecret)?;

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = parse_env("PORT", 4000)?;
        let data_dir = env::var(DATA_DIR_ENV).unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string());

        let token_ttl = Duration::from_secs(parse_env(
            "TOKEN_TTL_SECS",
            DEFAULT_TOKEN_TTL.as_secs(),
        )?);

        let google_client_id = env::var("GOOGLE_CLIENT_ID")
            .ok()
            .filter(|s| !s.trim().is_empty());

        let indexer_url = match env::var("INDEXER_URL") {
            Ok(raw) if !raw.trim().is_empty() => {
                Some(raw.parse::<Url>().map_err(|e| ConfigError::Invalid {
                    name: "INDEXER_URL",
                    reason: e.to_string(),
                })?)
            }
            _ => None,
        };

        let listing_cache_ttl = Duration::from_secs(parse_env(
            "LISTING_CACHE_TTL_SECS",
            DEFAULT_LISTING_CACHE_TTL.as_secs(),
        )?);
        let listing_poll_interval = Duration::from_secs(parse_env(
            "LISTING_POLL_SECS",
            DEFAULT_LISTING_POLL.as_secs(),
        )?);

        Ok(Self {
            host,
            port,
            data_dir,
            jwt_secret,
            token_ttl,
            google_client_id,
            indexer_url,
            listing_cache_ttl,
            listing_poll_interval,
        })
    }
}

/// Parse an environment variable, falling back to a default when unset.
fn parse_env<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}
