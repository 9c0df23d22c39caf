// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};

use crate::{
    auth::Auth,
    error::{ApiError, ErrorBody},
    models::{MeResponse, RegisterRequest, RegisterResponse},
    state::AppState,
};

/// Register a new user.
#[utoipa::path(
    post,
    path = "/register",
    tag = "Users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = RegisterResponse),
        (status = 400, description = "Missing name, password or role", body = ErrorBody),
        (status = 409, description = "Name already taken", body = ErrorBody)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let Json(request) = payload?;
    if request.name.trim().is_empty()
        || request.password.is_empty()
        || request.role.trim().is_empty()
    {
        return Err(ApiError::bad_request("name, password and role are required"));
    }

    let user = state
        .users
        .add(&request.name, &request.password, &request.role)
        .await?;

    Ok((StatusCode::CREATED, Json(RegisterResponse { id: user.id })))
}

/// Get the identity bound to the current request.
#[utoipa::path(
    get,
    path = "/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current identity", body = MeResponse),
        (status = 401, description = "Unauthorized - invalid or missing token", body = ErrorBody),
    )
)]
pub async fn get_current_user(Auth(ctx): Auth) -> Result<Json<MeResponse>, ApiError> {
    let user_id = ctx
        .read_identity()
        .ok_or_else(|| ApiError::unauthorized("no identity bound to request"))?;

    Ok(Json(MeResponse {
        user_id,
        role: ctx.read_role().unwrap_or_default().to_string(),
    }))
}
