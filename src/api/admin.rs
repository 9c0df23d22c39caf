// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Admin-only endpoints. Mounted behind `require_admin`.

use axum::Json;

use crate::{auth::Auth, error::ErrorBody, models::MessageResponse};

/// Reachable only with a token whose role is exactly `admin`.
#[utoipa::path(
    get,
    path = "/admin",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller is an admin", body = MessageResponse),
        (status = 401, description = "Not authenticated or not admin", body = ErrorBody)
    )
)]
pub async fn admin_only(Auth(ctx): Auth) -> Json<MessageResponse> {
    tracing::info!(user_id = ?ctx.read_identity(), "admin endpoint accessed");
    Json(MessageResponse {
        message: "admin only".to_string(),
    })
}
