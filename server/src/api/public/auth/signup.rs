use super::{validate_email, validate_password, AuthResponse};
use crate::api::{bounded_text, ErrorResponse, MAX_NAME_LENGTH};
use crate::auth::{hash_password, issue_token, session_cookie};
use crate::config::Config;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::{NewUser, Role, User};
use crate::schema::users;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use axum_extra::extract::CookieJar;
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use time::OffsetDateTime;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[utoipa::path(
    post,
    path = "/api/auth/signup",
    tag = "auth",
    request_body(content = SignupRequest, example = json!({"name": "Ada", "email": "ada@example.com", "password": "password123"})),
    responses(
        (status = 201, description = "User created and session cookie set", body = AuthResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 500, description = "Session could not be issued", body = ErrorResponse)
    )
)]
pub async fn signup(
    State(pool): State<Arc<DbPool>>,
    State(config): State<Arc<Config>>,
    jar: CookieJar,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let name = bounded_text(&req.name, "Name", MAX_NAME_LENGTH)?;
    let email = validate_email(&req.email)?;
    validate_password(&req.password)?;

    let password_hash = hash_password(&req.password)
        .map_err(|_| ApiError::Internal("Failed to hash password".to_string()))?;

    let mut conn = pool.get()?;

    // Roll back the insert if no session can be issued for the new account
    let (user, issued) = conn.transaction::<_, ApiError, _>(|conn| {
        let user: User = diesel::insert_into(users::table)
            .values(NewUser {
                name,
                email,
                password_hash: &password_hash,
                role: Role::User.as_str(),
            })
            .returning(User::as_returning())
            .get_result(conn)?;

        let issued = issue_token(&user, config.jwt_secret.as_deref(), OffsetDateTime::now_utc())?;
        Ok((user, issued))
    })?;

    tracing::info!(user_id = user.id, "User signed up");

    Ok((
        StatusCode::CREATED,
        jar.add(session_cookie(issued)),
        Json(AuthResponse::with_user("Registered successfully", &user)),
    ))
}
