use super::{author_summary, CommentRequest, CommentResponse};
use crate::api::recipes::find_recipe;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::{Comment, NewComment};
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
    post,
    path = "/api/recipes/{id}/comments",
    tag = "comments",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    request_body = CommentRequest,
    responses(
        (status = 201, description = "Comment added", body = CommentResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn create_comment(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<i32>,
    Json(req): Json<CommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let content = req.validated()?;
    let mut conn = pool.get()?;
    find_recipe(&mut conn, id)?;

    let created: Comment = diesel::insert_into(comment::table)
        .values(NewComment {
            recipe_id: id,
            user_id: user.id,
            content,
        })
        .returning(Comment::as_returning())
        .get_result(&mut conn)?;

    Ok((
        StatusCode::CREATED,
        Json(CommentResponse::new(created, author_summary(&user))),
    ))
}
