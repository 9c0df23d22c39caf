// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! This module defines the identity type shared by the token and store layers
//! and the request and response structures used by the REST API. API types
//! derive `Serialize`, `Deserialize`, and `ToSchema` for JSON handling and
//! OpenAPI documentation.
//!
//! ## Model Categories
//!
//! - **Identity**: [`UserId`], referenced by tokens and revocation records
//! - **Users**: the stored [`User`] record owned by the user directory
//! - **Auth**: register, login and session payloads

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// =============================================================================
// Identity
// =============================================================================

/// Opaque numeric user identifier.
///
/// Owned by the user directory. Tokens never embed it; the revocation store
/// maps each token id back to it.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UserId {
    fn from(value: i64) -> Self {
        UserId(value)
    }
}

// =============================================================================
// Users
// =============================================================================

/// A registered user as kept by the user directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    /// Unique login name, also embedded in tokens as `user_name`.
    pub name: String,
    /// bcrypt hash of the password.
    pub password_hash: String,
    /// Free-form role, e.g. `admin`.
    pub role: String,
}

/// Check a plaintext password against a bcrypt hash.
///
/// A malformed hash counts as a mismatch.
pub fn verify_password_hash(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

// =============================================================================
// Auth Models
// =============================================================================

/// Request body for creating a user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub password: String,
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponse {
    pub id: UserId,
}

/// Request body for exchanging credentials for an access token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub user_name: String,
    pub password: String,
}

/// Access token returned by a successful login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// RS256-signed JWT, valid for 30 minutes.
    pub access_token: String,
}

/// The identity bound to the current request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct MeResponse {
    pub user_id: UserId,
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_serializes_as_bare_number() {
        let json = serde_json::to_string(&UserId(20)).unwrap();
        assert_eq!(json, "20");
        let back: UserId = serde_json::from_str("20").unwrap();
        assert_eq!(back, UserId(20));
    }

    #[test]
    fn verify_password_matches_hash() {
        let user = User {
            id: UserId(1),
            name: "alice".to_string(),
            password_hash: bcrypt::hash("secret", 4).unwrap(),
            role: "admin".to_string(),
        };
        assert!(verify_password_hash("secret", &user.password_hash));
        assert!(!verify_password_hash("Secret", &user.password_hash));
    }

    #[test]
    fn verify_password_rejects_malformed_hash() {
        let user = User {
            id: UserId(1),
            name: "alice".to_string(),
            password_hash: "not-a-bcrypt-hash".to_string(),
            role: String::new(),
        };
        assert!(!verify_password_hash("anything", &user.password_hash));
    }
}
