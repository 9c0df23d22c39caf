// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication and authorization middleware for Axum.
//!
//! ## Layers
//!
//! - [`authenticate`] - validates the bearer token, re-reads the identity from
//!   the revocation store and binds an [`AuthContext`] into the request
//! - [`require_admin`] - admits only contexts whose role is exactly `admin`
//!
//! ## Usage
//!
//! ```rust,ignore
//! let protected = Router::new()
//!     .route("/me", get(me))
//!     .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));
//! ```
//!
//! Both layers fail closed: on any error the downstream handler never runs.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{AuthContext, AuthError, TokenError};
use crate::state::AppState;

/// A request whose bearer token has been validated, paired with the context
/// derived from it.
#[derive(Debug)]
pub struct AuthenticatedRequest {
    request: Request,
    context: AuthContext,
}

impl AuthenticatedRequest {
    pub fn context(&self) -> &AuthContext {
        &self.context
    }

    /// The request to hand downstream, with the context in its extensions.
    pub fn into_request(self) -> Request {
        let Self {
            mut request,
            context,
        } = self;
        request.extensions_mut().insert(context);
        request
    }
}

/// Validate `request` and build its [`AuthContext`].
///
/// The identity is loaded from the store again after validation rather than
/// taken from the token, so a record revoked in between is still caught.
pub async fn fill_context(
    state: &AppState,
    request: Request,
) -> Result<AuthenticatedRequest, TokenError> {
    let claims = state.signer.validate(request.headers()).await?;

    let user_id = state.store.load(&claims.jti).await.map_err(|err| {
        if err.is_not_found() {
            TokenError::Revoked {
                token_id: claims.jti.clone(),
            }
        } else {
            TokenError::StoreRead {
                token_id: claims.jti.clone(),
                source: err,
            }
        }
    })?;

    let context = AuthContext::new()
        .bind_identity(user_id)
        .bind_role(&claims)
        .bind_token_id(claims.jti.as_str());

    Ok(AuthenticatedRequest { request, context })
}

/// Authentication middleware function.
pub async fn authenticate(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();

    match fill_context(&state, request).await {
        Ok(authenticated) => next.run(authenticated.into_request()).await,
        Err(err) => {
            if err.is_rejected_token() {
                tracing::debug!(path = %path, error = %err, "rejected request");
            } else {
                tracing::warn!(path = %path, error = %err, "rejected request");
            }
            AuthError::from(err).into_response()
        }
    }
}

/// Authorization middleware for admin-only routes.
///
/// Must run after [`authenticate`]. Touches neither the signer nor the store.
pub async fn require_admin(request: Request, next: Next) -> Response {
    let Some(context) = request.extensions().get::<AuthContext>() else {
        return AuthError::unauthorized("no authentication context").into_response();
    };

    if !context.is_admin() {
        tracing::debug!(user_id = ?context.read_identity(), "non-admin on admin route");
        return AuthError::NotAdmin.into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Auth;
    use crate::clock::FixedClock;
    use crate::models::UserId;
    use crate::test_support;
    use axum::{
        body::{to_bytes, Body},
        http::{header::AUTHORIZATION, StatusCode},
        middleware,
        routing::get,
        Json, Router,
    };
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };
    use tower::ServiceExt;

    fn app(state: AppState, hits: Arc<AtomicUsize>) -> Router {
        let admin = Router::new()
            .route("/admin", get(|| async { "admin only" }))
            .route_layer(middleware::from_fn(require_admin));

        Router::new()
            .route(
                "/whoami",
                get(move |Auth(ctx): Auth| {
                    hits.fetch_add(1, Ordering::SeqCst);
                    async move {
                        Json(serde_json::json!({
                            "user_id": ctx.read_identity(),
                            "role": ctx.read_role(),
                        }))
                    }
                }),
            )
            .merge(admin)
            .route_layer(middleware::from_fn_with_state(state.clone(), authenticate))
            .with_state(state)
    }

    fn get_with_token(uri: &str, token: Option<&str>) -> Request {
        let mut builder = axum::http::Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn missing_header_is_rejected_before_handler() {
        let state = test_support::app_state(FixedClock::default());
        let hits = Arc::new(AtomicUsize::new(0));

        let response = app(state, hits.clone())
            .oneshot(get_with_token("/whoami", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["error"], "no valid auth info");
        assert_eq!(body["error_code"], "unauthorized");
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn invalid_token_is_rejected_before_handler() {
        let state = test_support::app_state(FixedClock::default());
        let hits = Arc::new(AtomicUsize::new(0));

        let response = app(state, hits.clone())
            .oneshot(get_with_token("/whoami", Some("not.a.token")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"], "no valid auth info");
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn valid_token_binds_identity_and_role() {
        let state = test_support::app_state(FixedClock::default());
        let token = state.signer.issue(UserId(20), "admin", "alice").await.unwrap();
        let hits = Arc::new(AtomicUsize::new(0));

        let response = app(state, hits.clone())
            .oneshot(get_with_token("/whoami", Some(&token)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["user_id"], 20);
        assert_eq!(body["role"], "admin");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn revoked_token_is_rejected() {
        let state = test_support::app_state(FixedClock::default());
        let token = state.signer.issue(UserId(21), "user", "bob").await.unwrap();
        let claims = state.signer.validate_token(&token).await.unwrap();
        state.store.delete(&claims.jti).await.unwrap();

        let hits = Arc::new(AtomicUsize::new(0));
        let response = app(state, hits.clone())
            .oneshot(get_with_token("/whoami", Some(&token)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert!(body["details"][0]
            .as_str()
            .unwrap()
            .contains("expired or revoked"));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn admin_route_rejects_other_roles() {
        let state = test_support::app_state(FixedClock::default());

        for role in ["user", "Admin", ""] {
            let token = state.signer.issue(UserId(22), role, "carol").await.unwrap();
            let response = app(state.clone(), Arc::new(AtomicUsize::new(0)))
                .oneshot(get_with_token("/admin", Some(&token)))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "role {role:?}");
            let body = body_json(response).await;
            assert_eq!(body["error"], "not admin");
        }
    }

    #[tokio::test]
    async fn admin_route_admits_admin() {
        let state = test_support::app_state(FixedClock::default());
        let token = state.signer.issue(UserId(23), "admin", "dana").await.unwrap();

        let response = app(state, Arc::new(AtomicUsize::new(0)))
            .oneshot(get_with_token("/admin", Some(&token)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn fill_context_carries_token_id() {
        let state = test_support::app_state(FixedClock::default());
        let token = state.signer.issue(UserId(24), "user", "erin").await.unwrap();

        let authenticated = fill_context(&state, get_with_token("/", Some(&token)))
            .await
            .unwrap();
        let context = authenticated.context().clone();
        assert_eq!(context.read_identity(), Some(UserId(24)));
        assert!(context.read_token_id().is_some());

        let request = authenticated.into_request();
        assert_eq!(request.extensions().get::<AuthContext>(), Some(&context));
    }
}
