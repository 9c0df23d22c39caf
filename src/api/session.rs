// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session endpoints: exchange credentials for a token and revoke it.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::{
    auth::Auth,
    error::{ApiError, ErrorBody},
    models::{verify_password_hash, LoginRequest, LoginResponse, MessageResponse, User},
    state::AppState,
    users::UserError,
};

/// Same answer for an unknown name and a wrong password.
const BAD_CREDENTIALS: &str = "invalid user name or password";

/// Well-formed bcrypt hash at `bcrypt::DEFAULT_COST` that matches no password.
/// Checked instead of a real hash when the user name is unknown.
const DUMMY_PASSWORD_HASH: &str = "$2b$12$LQv3c1yqBWVHxkd0LHAkCOYz6TtxMQJqhN8/LewY5GyYqExt7YD3a";

/// Runs `verify` exactly once whether or not `user` exists, so an unknown
/// name costs the same bcrypt work as a wrong password.
fn password_matches<F>(user: Option<&User>, password: &str, verify: F) -> bool
where
    F: Fn(&str, &str) -> bool,
{
    match user {
        Some(user) => verify(password, &user.password_hash),
        None => {
            verify(password, DUMMY_PASSWORD_HASH);
            false
        }
    }
}

/// Log in with a user name and password.
///
/// Returns an RS256 access token valid for 30 minutes.
#[utoipa::path(
    post,
    path = "/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Access token issued", body = LoginResponse),
        (status = 400, description = "Missing user name or password", body = ErrorBody),
        (status = 401, description = "Invalid credentials", body = ErrorBody),
        (status = 500, description = "Token could not be issued", body = ErrorBody)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(request) = payload?;
    if request.user_name.trim().is_empty() || request.password.is_empty() {
        return Err(ApiError::bad_request("user_name and password are required"));
    }

    let user = match state.users.find_by_name(&request.user_name).await {
        Ok(user) => Some(user),
        Err(UserError::NotFound(_)) => None,
        Err(err) => return Err(err.into()),
    };

    // Always run bcrypt so response time does not reveal registered names.
    let verified = password_matches(user.as_ref(), &request.password, verify_password_hash);
    let user = match user {
        Some(user) if verified => user,
        Some(user) => {
            tracing::debug!(user_id = %user.id, "password mismatch");
            return Err(ApiError::unauthorized(BAD_CREDENTIALS));
        }
        None => return Err(ApiError::unauthorized(BAD_CREDENTIALS)),
    };

    let access_token = state
        .signer
        .issue(user.id, &user.role, &user.name)
        .await
        .map_err(|err| {
            tracing::error!(user_id = %user.id, error = %err, "failed to issue access token");
            ApiError::internal("failed to issue access token").with_detail(err)
        })?;

    Ok(Json(LoginResponse { access_token }))
}

/// Revoke the access token used for this request.
#[utoipa::path(
    post,
    path = "/logout",
    tag = "Auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Token revoked", body = MessageResponse),
        (status = 401, description = "Not authenticated", body = ErrorBody),
        (status = 500, description = "Revocation store failure", body = ErrorBody)
    )
)]
pub async fn logout(
    Auth(ctx): Auth,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    let token_id = ctx
        .read_token_id()
        .ok_or_else(|| ApiError::unauthorized("no token bound to request"))?;

    state.store.delete(token_id).await.map_err(|err| {
        tracing::error!(token_id, error = %err, "failed to revoke access token");
        ApiError::internal("failed to revoke access token").with_detail(err)
    })?;

    tracing::info!(token_id, user_id = ?ctx.read_identity(), "revoked access token");
    Ok(Json(MessageResponse {
        message: "logged out".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserId;
    use std::cell::RefCell;

    fn user(password_hash: &str) -> User {
        User {
            id: UserId(1),
            name: "erin".into(),
            role: "user".into(),
            password_hash: password_hash.into(),
        }
    }

    #[test]
    fn unknown_user_still_runs_password_check() {
        let checked = RefCell::new(Vec::new());
        let matched = password_matches(None, "guess", |password, hash| {
            checked.borrow_mut().push((password.to_string(), hash.to_string()));
            true
        });

        assert!(!matched);
        assert_eq!(
            checked.into_inner(),
            vec![("guess".to_string(), DUMMY_PASSWORD_HASH.to_string())]
        );
    }

    #[test]
    fn known_user_checks_stored_hash_once() {
        let calls = RefCell::new(0);
        let user = user("stored-hash");
        let matched = password_matches(Some(&user), "pw", |_, hash| {
            *calls.borrow_mut() += 1;
            hash == "stored-hash"
        });

        assert!(matched);
        assert_eq!(calls.into_inner(), 1);
    }

    #[test]
    fn dummy_hash_is_full_cost_and_matches_nothing() {
        let parts: bcrypt::HashParts = DUMMY_PASSWORD_HASH.parse().unwrap();
        assert_eq!(parts.get_cost(), bcrypt::DEFAULT_COST);
        // A parse failure would return early without hashing.
        assert!(!bcrypt::verify("hunter2", DUMMY_PASSWORD_HASH).unwrap());
    }

    #[test]
    fn real_hash_still_verifies() {
        let user = user(&bcrypt::hash("secret", 4).unwrap());
        assert!(password_matches(Some(&user), "secret", verify_password_hash));
        assert!(!password_matches(Some(&user), "Secret", verify_password_hash));
    }
}
