use super::find_comment;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::schema::comment;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use diesel::prelude::*;
use std::sync::Arc;

#[utoipa::path(
    delete,
    path = "/api/comments/{id}",
    tag = "comments",
    params(
        ("id" = i32, Path, description = "Comment ID")
    ),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "Comment not found", body = ErrorResponse)
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn delete_comment(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    let existing = find_comment(&mut conn, id)?;
    if existing.user_id != user.id && !user.is_admin() {
        return Err(ApiError::Forbidden("Only the author can delete this comment"));
    }

    diesel::delete(comment::table.find(id)).execute(&mut conn)?;

    if existing.user_id != user.id {
        tracing::info!(admin_id = user.id, comment_id = id, "Admin removed comment");
    }

    Ok(StatusCode::NO_CONTENT)
}
