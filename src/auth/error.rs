// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.
//!
//! [`TokenError`] is what the signer returns; it keeps the failing phase and
//! token id for logs. [`AuthError`] is what a client sees. Every token failure
//! becomes the same `unauthorized` response so callers cannot tell a forged
//! token from an expired or revoked one.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::error::ErrorBody;
use crate::store::StoreError;

/// Failures while issuing or validating a token.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Claims could not be assembled. Indicates a programming error.
    #[error("failed to build claims: {0}")]
    ClaimBuild(String),

    #[error("failed to save token {token_id}: {source}")]
    StoreWrite {
        token_id: String,
        #[source]
        source: StoreError,
    },

    #[error("failed to load token {token_id}: {source}")]
    StoreRead {
        token_id: String,
        #[source]
        source: StoreError,
    },

    /// The store has no record: the token expired there or was revoked.
    #[error("token {token_id} expired or revoked")]
    Revoked { token_id: String },

    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    /// Bad signature, wrong algorithm, wrong issuer/subject or undecodable.
    #[error("invalid token: {0}")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),

    #[error("token {token_id} has expired")]
    Expired { token_id: String },

    #[error("token {token_id} is not valid yet")]
    NotYetValid { token_id: String },

    #[error("authorization header is missing")]
    MissingToken,

    #[error("authorization header is not a bearer token")]
    MalformedHeader,
}

impl TokenError {
    /// Signature, parse and time-window failures. These never reach the store.
    pub fn is_rejected_token(&self) -> bool {
        matches!(
            self,
            TokenError::InvalidToken(_)
                | TokenError::Expired { .. }
                | TokenError::NotYetValid { .. }
                | TokenError::MissingToken
                | TokenError::MalformedHeader
        )
    }
}

/// Authentication error returned to HTTP clients.
#[derive(Debug)]
pub enum AuthError {
    /// Any failure to establish the caller's identity. `detail` is diagnostic.
    Unauthorized { detail: String },
    /// Identity is known but the route needs the `admin` role.
    NotAdmin,
}

impl AuthError {
    pub fn unauthorized(detail: impl ToString) -> Self {
        AuthError::Unauthorized {
            detail: detail.to_string(),
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::Unauthorized { .. } => "unauthorized",
            AuthError::NotAdmin => "not_admin",
        }
    }

    /// Both variants are 401: the admin check answers like the original
    /// authentication failure rather than with 403.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::Unauthorized { .. } => write!(f, "no valid auth info"),
            AuthError::NotAdmin => write!(f, "not admin"),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        AuthError::unauthorized(err)
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let details = match &self {
            AuthError::Unauthorized { detail } => vec![detail.clone()],
            AuthError::NotAdmin => Vec::new(),
        };
        let body = Json(ErrorBody {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
            details,
        });
        (status, body).into_response()
    }
}
