// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Redis/Valkey-backed revocation store.
//!
//! Each record is a plain string key `prefix + token_id` holding the user id,
//! written with `SET .. EX ttl` so Redis drops it when the token would have
//! expired anyway. A missing key is reported as [`StoreError::NotFound`].

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use super::{RevocationStore, StoreError, DEFAULT_RECORD_TTL};
use crate::models::UserId;

/// Upper bound for a single Redis round-trip.
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(2);

/// [`RevocationStore`] over a shared Redis connection.
///
/// `ConnectionManager` multiplexes one connection and reconnects on failure;
/// cloning it is cheap and clones can be used concurrently, so the store
/// needs no locking of its own.
#[derive(Clone)]
pub struct RedisStore {
    connection: ConnectionManager,
    prefix: String,
    ttl: Duration,
    operation_timeout: Duration,
}

impl RedisStore {
    /// Wrap an existing connection manager.
    ///
    /// The `prefix` is normalized to always end with `:`.
    pub fn new(connection: ConnectionManager, prefix: impl Into<String>) -> Self {
        Self {
            connection,
            prefix: normalize_prefix(prefix.into()),
            ttl: DEFAULT_RECORD_TTL,
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }

    /// Connect to `redis_url` (e.g. `redis://127.0.0.1:6379/`).
    pub async fn connect(redis_url: &str, prefix: impl Into<String>) -> Result<Self, StoreError> {
        let client = redis::Client::open(redis_url)?;
        let connection = client.get_connection_manager().await?;
        Ok(Self::new(connection, prefix))
    }

    /// Override the record TTL. Values under one second are rounded up.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }

    fn key(&self, token_id: &str) -> String {
        format!("{}{}", self.prefix, token_id)
    }

    fn ttl_seconds(&self) -> u64 {
        ttl_seconds(self.ttl)
    }

    async fn bounded<T, F>(&self, operation: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, redis::RedisError>>,
    {
        match tokio::time::timeout(self.operation_timeout, operation).await {
            Ok(result) => result.map_err(StoreError::from),
            Err(_) => Err(StoreError::Timeout(self.operation_timeout)),
        }
    }
}

fn normalize_prefix(mut prefix: String) -> String {
    if !prefix.ends_with(':') {
        prefix.push(':');
    }
    prefix
}

/// `EX` takes whole seconds and rejects zero.
fn ttl_seconds(ttl: Duration) -> u64 {
    let secs = ttl.as_secs();
    if ttl.subsec_nanos() > 0 {
        secs.saturating_add(1)
    } else {
        secs.max(1)
    }
}

#[async_trait]
impl RevocationStore for RedisStore {
    async fn save(&self, token_id: &str, user_id: UserId) -> Result<(), StoreError> {
        let key = self.key(token_id);
        let ttl = self.ttl_seconds();
        let mut connection = self.connection.clone();

        self.bounded(async move {
            let mut set = redis::cmd("SET");
            set.arg(key).arg(user_id.0).arg("EX").arg(ttl);
            let reply: Result<(), redis::RedisError> = set.query_async(&mut connection).await;
            reply
        })
        .await
    }

    async fn load(&self, token_id: &str) -> Result<UserId, StoreError> {
        let key = self.key(token_id);
        let mut connection = self.connection.clone();

        let value: Option<i64> = self
            .bounded(async move { connection.get(key).await })
            .await?;
        value.map(UserId).ok_or(StoreError::NotFound)
    }

    async fn delete(&self, token_id: &str) -> Result<(), StoreError> {
        let key = self.key(token_id);
        let mut connection = self.connection.clone();

        // DEL reports how many keys went away; revocation does not care.
        let _removed: i64 = self
            .bounded(async move { connection.del(key).await })
            .await?;
        Ok(())
    }
}
