// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Revocation Store
//!
//! Server-side record of every issued access token, keyed by the token id
//! (`jti`). A signed token is only honoured while its record exists, so
//! deleting the record (logout) or letting it expire revokes the token.
//!
//! ## Contract
//!
//! - `save` is an upsert that applies the store's TTL
//! - `load` returns [`StoreError::NotFound`] when there is no record; that is
//!   an expected outcome and callers branch on it with
//!   [`StoreError::is_not_found`]
//! - `delete` is idempotent
//!
//! ## Implementations
//!
//! - [`RedisStore`] - Redis/Valkey, TTL enforced by the server
//! - [`InMemoryStore`] - process-local map with clock-driven eviction

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::UserId;

mod memory;
mod redis_store;

pub use memory::InMemoryStore;
pub use redis_store::RedisStore;

/// Default lifetime of a revocation record. Matches the access token TTL.
pub const DEFAULT_RECORD_TTL: Duration = Duration::from_secs(30 * 60);

/// Errors returned by revocation store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record for the requested token id.
    #[error("not found")]
    NotFound,

    /// The backing service failed or returned something unusable.
    #[error("store backend error: {0}")]
    Backend(#[from] redis::RedisError),

    /// The backing service did not answer in time.
    #[error("store operation timed out after {0:?}")]
    Timeout(Duration),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound)
    }
}

/// Key-value mapping from token id to the identity it was issued for.
#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Record `token_id -> user_id`, overwriting any existing record.
    async fn save(&self, token_id: &str, user_id: UserId) -> Result<(), StoreError>;

    /// Look up the identity for `token_id`.
    async fn load(&self, token_id: &str) -> Result<UserId, StoreError>;

    /// Remove the record for `token_id`. Missing records are not an error.
    async fn delete(&self, token_id: &str) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_distinguishable() {
        assert!(StoreError::NotFound.is_not_found());
        assert!(!StoreError::Timeout(Duration::from_secs(1)).is_not_found());
    }

    #[test]
    fn default_ttl_is_thirty_minutes() {
        assert_eq!(DEFAULT_RECORD_TTL.as_secs(), 1800);
    }
}
