// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-process revocation store.
//!
//! Records expire against the injected [`Clock`], so tests can move time
//! forward without sleeping. Expired records are dropped when read back and
//! swept on every write, so tokens that are never presented again do not
//! accumulate.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{RevocationStore, StoreError, DEFAULT_RECORD_TTL};
use crate::clock::Clock;
use crate::models::UserId;

struct Record {
    user_id: UserId,
    /// `None` when `now + ttl` overflows; such a record never expires.
    expires_at: Option<DateTime<Utc>>,
}

impl Record {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|deadline| now < deadline).unwrap_or(true)
    }
}

/// `HashMap`-backed [`RevocationStore`].
pub struct InMemoryStore {
    records: RwLock<HashMap<String, Record>>,
    ttl: chrono::Duration,
    clock: Arc<dyn Clock>,
}

impl InMemoryStore {
    /// Create an empty store using [`DEFAULT_RECORD_TTL`].
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_ttl(clock, DEFAULT_RECORD_TTL)
    }

    pub fn with_ttl(clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            ttl: chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX),
            clock,
        }
    }

    /// Number of records currently held, including expired ones not yet evicted.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl RevocationStore for InMemoryStore {
    async fn save(&self, token_id: &str, user_id: UserId) -> Result<(), StoreError> {
        let now = self.clock.now();
        let expires_at = now.checked_add_signed(self.ttl);

        let mut records = self.records.write().await;
        records.retain(|_, record| record.is_live(now));
        records.insert(token_id.to_string(), Record { user_id, expires_at });
        Ok(())
    }

    async fn load(&self, token_id: &str) -> Result<UserId, StoreError> {
        let now = self.clock.now();
        {
            let records = self.records.read().await;
            match records.get(token_id) {
                Some(record) if record.is_live(now) => return Ok(record.user_id),
                Some(_) => {}
                None => return Err(StoreError::NotFound),
            }
        }

        // Expired: evict.
        let mut records = self.records.write().await;
        if records.get(token_id).is_some_and(|record| !record.is_live(now)) {
            records.remove(token_id);
        }
        Err(StoreError::NotFound)
    }

    async fn delete(&self, token_id: &str) -> Result<(), StoreError> {
        self.records.write().await.remove(token_id);
        Ok(())
    }
}
