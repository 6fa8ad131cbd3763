use super::UserResponse;
use crate::api::{bounded_text, ErrorResponse, MAX_NAME_LENGTH};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::User;
use crate::schema::users;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateMeRequest {
    pub name: String,
}

#[utoipa::path(
    patch,
    path = "/api/users/me",
    tag = "users",
    request_body = UpdateMeRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn update_me(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(req): Json<UpdateMeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let name = bounded_text(&req.name, "Name", MAX_NAME_LENGTH)?;
    let mut conn = pool.get()?;

    let updated: User = diesel::update(users::table.find(user.id))
        .set(users::name.eq(name))
        .returning(User::as_returning())
        .get_result(&mut conn)?;

    Ok((StatusCode::OK, Json(UserResponse::from(&updated))))
}
