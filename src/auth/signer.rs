// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token issuance and validation.
//!
//! ## Issue
//!
//! 1. Generate a UUID v4 token id (`jti`)
//! 2. Build [`Claims`] from the injected clock, valid for 30 minutes
//! 3. Save `jti -> user id` in the revocation store
//! 4. Sign the claims with RS256 and return the compact token
//!
//! A failed store write aborts issuance; no token is returned.
//!
//! ## Validate
//!
//! Checks run cheapest first and stop at the first failure:
//!
//! 1. `Authorization: Bearer <token>` is present
//! 2. RS256 signature, `iss` and `sub` (the JWT library does not look at `exp`)
//! 3. `exp > now` and `iat <= now` against the injected clock
//! 4. The revocation store still has a record for `jti`
//!
//! A forged token never costs a store round-trip.

use std::sync::Arc;

use axum::http::{header::AUTHORIZATION, HeaderMap};
use jsonwebtoken::{decode, encode, Header, Validation};
use uuid::Uuid;

use super::claims::{access_token_ttl, Claims, ISSUER, SUBJECT};
use super::keys::{SigningKeys, SIGNING_ALGORITHM};
use super::TokenError;
use crate::clock::Clock;
use crate::models::UserId;
use crate::store::RevocationStore;

/// Issues and validates revocable access tokens.
#[derive(Clone)]
pub struct Signer {
    keys: Arc<SigningKeys>,
    store: Arc<dyn RevocationStore>,
    clock: Arc<dyn Clock>,
}

impl Signer {
    pub fn new(
        keys: Arc<SigningKeys>,
        store: Arc<dyn RevocationStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { keys, store, clock }
    }

    /// The revocation store this signer writes to and reads from.
    pub fn store(&self) -> &Arc<dyn RevocationStore> {
        &self.store
    }

    /// Issue a token for `user_id` carrying `role` and `user_name`.
    pub async fn issue(
        &self,
        user_id: UserId,
        role: &str,
        user_name: &str,
    ) -> Result<String, TokenError> {
        let token_id = Uuid::new_v4().to_string();
        let claims = Claims::new(
            token_id.clone(),
            self.clock.now(),
            access_token_ttl(),
            role,
            user_name,
        )?;

        self.store
            .save(&token_id, user_id)
            .await
            .map_err(|source| TokenError::StoreWrite {
                token_id: token_id.clone(),
                source,
            })?;

        let token = encode(
            &Header::new(SIGNING_ALGORITHM),
            &claims,
            self.keys.encoding_key(),
        )
        .map_err(TokenError::Signing)?;

        tracing::info!(token_id = %token_id, user_id = %user_id, role, "issued access token");
        Ok(token)
    }

    /// Validate the bearer token carried in `headers`.
    pub async fn validate(&self, headers: &HeaderMap) -> Result<Claims, TokenError> {
        let token = bearer_token(headers)?;
        self.validate_token(token).await
    }

    /// Validate a raw compact token.
    pub async fn validate_token(&self, token: &str) -> Result<Claims, TokenError> {
        let claims = decode::<Claims>(token, self.keys.decoding_key(), &validation())
            .map_err(TokenError::InvalidToken)?
            .claims;

        let now = self.clock.now();
        if claims.is_expired_at(now) {
            return Err(TokenError::Expired {
                token_id: claims.jti,
            });
        }
        if claims.is_not_yet_valid_at(now) {
            return Err(TokenError::NotYetValid {
                token_id: claims.jti,
            });
        }

        match self.store.load(&claims.jti).await {
            Ok(_) => Ok(claims),
            Err(err) if err.is_not_found() => Err(TokenError::Revoked {
                token_id: claims.jti,
            }),
            Err(source) => Err(TokenError::StoreRead {
                token_id: claims.jti,
                source,
            }),
        }
    }
}

/// Signature, algorithm, issuer and subject checks. Time is checked by the
/// signer against its own clock, so `exp` is only required to be present.
fn validation() -> Validation {
    let mut validation = Validation::new(SIGNING_ALGORITHM);
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.validate_aud = false;
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);
    validation.set_issuer(&[ISSUER]);
    validation.sub = Some(SUBJECT.to_string());
    validation
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, TokenError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(TokenError::MissingToken)?
        .to_str()
        .map_err(|_| TokenError::MalformedHeader)?;

    let token = value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or(TokenError::MalformedHeader)?;
    if token.is_empty() {
        return Err(TokenError::MalformedHeader);
    }
    Ok(token)
}
