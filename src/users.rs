// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # User Directory
//!
//! Owns user records and their identities. The auth layer only needs two
//! operations: create a user at registration and look one up by name at
//! login. Passwords are stored as bcrypt hashes.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::models::{User, UserId};

#[derive(Debug, Error)]
pub enum UserError {
    #[error("user '{0}' already exists")]
    AlreadyExists(String),

    #[error("user '{0}' not found")]
    NotFound(String),

    #[error("failed to hash password: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

/// Storage for registered users.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a user, hashing `password`. Names are unique.
    async fn add(&self, name: &str, password: &str, role: &str) -> Result<User, UserError>;

    async fn find_by_name(&self, name: &str) -> Result<User, UserError>;
}

/// Process-local [`UserRepository`].
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<String, User>>,
    next_id: AtomicI64,
    bcrypt_cost: u32,
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::with_cost(bcrypt::DEFAULT_COST)
    }

    /// Use a specific bcrypt cost. Tests pass the minimum (4).
    pub fn with_cost(bcrypt_cost: u32) -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
            bcrypt_cost,
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn add(&self, name: &str, password: &str, role: &str) -> Result<User, UserError> {
        if self.users.read().await.contains_key(name) {
            return Err(UserError::AlreadyExists(name.to_string()));
        }

        // Hash outside the write lock.
        let password_hash = bcrypt::hash(password, self.bcrypt_cost)?;

        let mut users = self.users.write().await;
        if users.contains_key(name) {
            return Err(UserError::AlreadyExists(name.to_string()));
        }
        let user = User {
            id: UserId(self.next_id.fetch_add(1, Ordering::Relaxed)),
            name: name.to_string(),
            password_hash,
            role: role.to_string(),
        };
        users.insert(user.name.clone(), user.clone());

        tracing::info!(user_id = %user.id, name = %user.name, "registered user");
        Ok(user)
    }

    async fn find_by_name(&self, name: &str) -> Result<User, UserError> {
        self.users
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| UserError::NotFound(name.to_string()))
    }
}
