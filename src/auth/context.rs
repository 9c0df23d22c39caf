// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-request authentication context.
//!
//! The middleware builds an [`AuthContext`] once a token has been validated
//! and stores it in the request extensions. Handlers read it back with the
//! [`Auth`](super::Auth) extractor. Binding returns a new value; fields are
//! private so nothing downstream can rewrite the identity.

use super::Claims;
use crate::models::UserId;

/// Role that passes the admin check. Compared case-sensitively.
pub const ADMIN_ROLE: &str = "admin";

/// Identity and role bound to the current request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthContext {
    user_id: Option<UserId>,
    role: Option<String>,
    token_id: Option<String>,
}

impl AuthContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind_identity(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn read_identity(&self) -> Option<UserId> {
        self.user_id
    }

    /// Attach the role claim. An absent claim binds as the empty role.
    pub fn bind_role(mut self, claims: &Claims) -> Self {
        self.role = Some(claims.role.clone());
        self
    }

    pub fn read_role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    pub fn bind_token_id(mut self, token_id: impl Into<String>) -> Self {
        self.token_id = Some(token_id.into());
        self
    }

    pub fn read_token_id(&self) -> Option<&str> {
        self.token_id.as_deref()
    }

    pub fn is_admin(&self) -> bool {
        self.read_role() == Some(ADMIN_ROLE)
    }
}
