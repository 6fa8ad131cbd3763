use super::{validate_password, AuthResponse};
use crate::api::ErrorResponse;
use crate::auth::{find_user_by_reset_token, hash_password};
use crate::db::DbPool;
use crate::error::ApiError;
use crate::schema::users;
use axum::{extract::State, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
}

#[utoipa::path(
    post,
    path = "/api/auth/reset-password",
    tag = "auth",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = AuthResponse),
        (status = 400, description = "Invalid or expired token, or weak password", body = ErrorResponse)
    )
)]
pub async fn reset_password(
    State(pool): State<Arc<DbPool>>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_password(&req.password)?;

    let mut conn = pool.get()?;

    let user = find_user_by_reset_token(&mut conn, req.token.trim())?
        .ok_or_else(|| ApiError::BadRequest("Invalid or expired reset token".to_string()))?;

    let password_hash = hash_password(&req.password)
        .map_err(|_| ApiError::Internal("Failed to hash password".to_string()))?;

    // The token is single-use
    diesel::update(users::table.find(user.id))
        .set((
            users::password_hash.eq(&password_hash),
            users::reset_password_token_hash.eq(None::<String>),
            users::reset_password_expires_at.eq(None::<DateTime<Utc>>),
        ))
        .execute(&mut conn)?;

    tracing::info!(user_id = user.id, "Password reset completed");

    Ok(Json(AuthResponse::message("Password has been reset")))
}
