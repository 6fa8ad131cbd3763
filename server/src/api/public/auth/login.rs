use super::AuthResponse;
use crate::api::ErrorResponse;
use crate::auth::{find_user_by_email, issue_token, session_cookie, verify_password};
use crate::config::Config;
use crate::db::DbPool;
use crate::error::ApiError;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use std::sync::Arc;
use time::OffsetDateTime;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body(content = LoginRequest, example = json!({"email": "ada@example.com", "password": "password123"})),
    responses(
        (status = 200, description = "Login successful, session cookie set", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Session could not be issued", body = ErrorResponse)
    )
)]
pub async fn login(
    State(pool): State<Arc<DbPool>>,
    State(config): State<Arc<Config>>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    let user = match find_user_by_email(&mut conn, req.email.trim())? {
        Some(u) if verify_password(&req.password, &u.password_hash) => u,
        _ => return Err(ApiError::BadCredentials),
    };

    let issued = issue_token(&user, config.jwt_secret.as_deref(), OffsetDateTime::now_utc())?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok((
        StatusCode::OK,
        jar.add(session_cookie(issued)),
        Json(AuthResponse::with_user("Logged in successfully", &user)),
    ))
}
