// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims carried by access tokens.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::TokenError;

/// `iss` of every token this service issues.
pub const ISSUER: &str = "github.com/relational-network/relational-auth";

/// `sub` of every access token.
pub const SUBJECT: &str = "access_token";

/// Lifetime of an access token, in seconds.
pub const ACCESS_TOKEN_TTL_SECS: i64 = 30 * 60;

/// Lifetime of an access token.
pub fn access_token_ttl() -> Duration {
    Duration::seconds(ACCESS_TOKEN_TTL_SECS)
}

/// Claims embedded in an access token.
///
/// The user id is deliberately absent: the revocation store maps `jti` back
/// to the identity, which is what makes a token revocable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Token id, unique per issuance. Revocation store key.
    pub jti: String,
    pub iss: String,
    pub sub: String,
    /// Issued at (Unix seconds)
    pub iat: i64,
    /// Expiration (Unix seconds)
    pub exp: i64,
    /// Free-form role. Missing in the payload decodes as empty.
    #[serde(default)]
    pub role: String,
    /// Display name of the user.
    #[serde(default)]
    pub user_name: String,
}

impl Claims {
    /// Build claims for a new token issued at `issued_at`.
    pub fn new(
        token_id: impl Into<String>,
        issued_at: DateTime<Utc>,
        ttl: Duration,
        role: impl Into<String>,
        user_name: impl Into<String>,
    ) -> Result<Self, TokenError> {
        let token_id = token_id.into();
        if token_id.is_empty() {
            return Err(TokenError::ClaimBuild("token id must not be empty".into()));
        }
        if ttl <= Duration::zero() {
            return Err(TokenError::ClaimBuild(format!(
                "ttl must be positive, got {ttl}"
            )));
        }

        let iat = issued_at.timestamp();
        let exp = iat
            .checked_add(ttl.num_seconds().max(1))
            .ok_or_else(|| TokenError::ClaimBuild("expiration overflows".into()))?;

        Ok(Self {
            jti: token_id,
            iss: ISSUER.to_string(),
            sub: SUBJECT.to_string(),
            iat,
            exp,
            role: role.into(),
            user_name: user_name.into(),
        })
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// `true` once `now` has reached `exp`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.exp <= now.timestamp()
    }

    /// `true` while `now` is still before `iat`.
    pub fn is_not_yet_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.iat > now.timestamp()
    }
}
