// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for the authenticated context.
//!
//! Use the `Auth` extractor in handlers behind the
//! [`authenticate`](super::middleware::authenticate) layer:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(ctx): Auth) -> impl IntoResponse {
//!     // ctx.read_identity(), ctx.read_role()
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use super::{AuthContext, AuthError};

/// Extractor for the [`AuthContext`] bound by the middleware.
///
/// Rejects with 401 when no context is present, i.e. when the route was
/// mounted without the authentication layer.
pub struct Auth(pub AuthContext);

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .map(Auth)
            .ok_or_else(|| AuthError::unauthorized("no authentication context"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserId;
    use axum::http::Request;

    #[tokio::test]
    async fn auth_extractor_requires_context() {
        let mut parts = Request::builder()
            .uri("/test")
            .body(())
            .unwrap()
            .into_parts()
            .0;

        let result = Auth::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthError::Unauthorized { .. })));
    }

    #[tokio::test]
    async fn auth_extractor_reads_extensions() {
        let mut parts = Request::builder()
            .uri("/test")
            .body(())
            .unwrap()
            .into_parts()
            .0;
        parts
            .extensions
            .insert(AuthContext::new().bind_identity(UserId(42)));

        let Auth(ctx) = Auth::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(ctx.read_identity(), Some(UserId(42)));
    }
}
