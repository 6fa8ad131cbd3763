use super::{author_summary, find_comment, CommentRequest, CommentResponse};
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::Comment;
use crate::schema::comment;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use std::sync::Arc;

#[utoipa::path(
    patch,
    path = "/api/comments/{id}",
    tag = "comments",
    params(
        ("id" = i32, Path, description = "Comment ID")
    ),
    request_body = CommentRequest,
    responses(
        (status = 200, description = "Comment edited", body = CommentResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "Comment not found", body = ErrorResponse)
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn update_comment(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<i32>,
    Json(req): Json<CommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let content = req.validated()?;
    let mut conn = pool.get()?;

    // Admins may remove comments but not rewrite them
    let existing = find_comment(&mut conn, id)?;
    if existing.user_id != user.id {
        return Err(ApiError::Forbidden("Only the author can edit this comment"));
    }

    let updated: Comment = diesel::update(comment::table.find(id))
        .set(comment::content.eq(content))
        .returning(Comment::as_returning())
        .get_result(&mut conn)?;

    Ok((
        StatusCode::OK,
        Json(CommentResponse::new(updated, author_summary(&user))),
    ))
}
