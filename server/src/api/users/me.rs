use super::UserResponse;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::error::ApiError;
use axum::{http::StatusCode, response::IntoResponse, Json};

#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "users",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn get_me(AuthUser(user): AuthUser) -> Result<impl IntoResponse, ApiError> {
    Ok((StatusCode::OK, Json(UserResponse::from(&user))))
}
