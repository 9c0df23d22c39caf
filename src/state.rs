// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::Signer;
use crate::store::RevocationStore;
use crate::users::UserRepository;

#[derive(Clone)]
pub struct AppState {
    pub signer: Arc<Signer>,
    /// Same store the signer uses; the middleware reads it again after
    /// validation and logout deletes from it.
    pub store: Arc<dyn RevocationStore>,
    pub users: Arc<dyn UserRepository>,
}

impl AppState {
    pub fn new(signer: Signer, users: Arc<dyn UserRepository>) -> Self {
        let store = signer.store().clone();
        Self {
            signer: Arc::new(signer),
            store,
            users,
        }
    }
}
