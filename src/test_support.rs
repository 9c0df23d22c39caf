// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Fixtures shared by unit tests.

use std::sync::Arc;

use async_trait::async_trait;

use crate::auth::{Signer, SigningKeys};
use crate::clock::FixedClock;
use crate::models::UserId;
use crate::state::AppState;
use crate::store::{InMemoryStore, RevocationStore, StoreError};
use crate::users::InMemoryUserRepository;

pub const PRIVATE_PEM: &[u8] = include_bytes!("../testdata/keys/signing.pem");
pub const PUBLIC_PEM: &[u8] = include_bytes!("../testdata/keys/signing.pub.pem");
pub const OTHER_PRIVATE_PEM: &[u8] = include_bytes!("../testdata/keys/other.pem");
pub const OTHER_PUBLIC_PEM: &[u8] = include_bytes!("../testdata/keys/other.pub.pem");

pub fn keys() -> Arc<SigningKeys> {
    Arc::new(SigningKeys::from_pem(PRIVATE_PEM, PUBLIC_PEM).unwrap())
}

pub fn other_keys() -> SigningKeys {
    SigningKeys::from_pem(OTHER_PRIVATE_PEM, OTHER_PUBLIC_PEM).unwrap()
}

/// Signer over the fixture keys with time frozen at `clock`.
pub fn signer(store: Arc<dyn RevocationStore>, clock: FixedClock) -> Signer {
    Signer::new(keys(), store, Arc::new(clock))
}

/// App state with in-memory store and users, all on `clock`.
pub fn app_state(clock: FixedClock) -> AppState {
    let store: Arc<dyn RevocationStore> = Arc::new(InMemoryStore::new(Arc::new(clock)));
    AppState::new(
        signer(store, clock),
        Arc::new(InMemoryUserRepository::with_cost(4)),
    )
}

/// Store whose every operation times out.
pub struct FailingStore;

#[async_trait]
impl RevocationStore for FailingStore {
    async fn save(&self, _token_id: &str, _user_id: UserId) -> Result<(), StoreError> {
        Err(StoreError::Timeout(std::time::Duration::from_secs(2)))
    }

    async fn load(&self, _token_id: &str) -> Result<UserId, StoreError> {
        Err(StoreError::Timeout(std::time::Duration::from_secs(2)))
    }

    async fn delete(&self, _token_id: &str) -> Result<(), StoreError> {
        Err(StoreError::Timeout(std::time::Duration::from_secs(2)))
    }
}
