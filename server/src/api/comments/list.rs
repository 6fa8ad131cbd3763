use super::CommentResponse;
use crate::api::follows::list::UserSummary;
use crate::api::recipes::find_recipe;
use crate::api::{ErrorResponse, PageParams};
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::Comment;
use crate::schema::{comment, users};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommentListResponse {
    pub comments: Vec<CommentResponse>,
    pub total: i64,
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}/comments",
    tag = "comments",
    params(
        ("id" = i32, Path, description = "Recipe ID"),
        PageParams
    ),
    responses(
        (status = 200, description = "Comments, oldest first", body = CommentListResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn list_comments(
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<i32>,
    Query(page): Query<PageParams>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;
    find_recipe(&mut conn, id)?;

    let total: i64 = comment::table
        .filter(comment::recipe_id.eq(id))
        .count()
        .get_result(&mut conn)?;

    let rows: Vec<(Comment, (i32, String, Option<i32>))> = comment::table
        .inner_join(users::table)
        .filter(comment::recipe_id.eq(id))
        .order((comment::created_at.asc(), comment::comment_id.asc()))
        .limit(page.limit())
        .offset(page.offset())
        .select((
            Comment::as_select(),
            (users::id, users::name, users::profile_picture_file_id),
        ))
        .load(&mut conn)?;

    let comments = rows
        .into_iter()
        .map(|(c, (user_id, name, picture))| {
            CommentResponse::new(c, UserSummary::new(user_id, name, picture))
        })
        .collect();

    Ok((StatusCode::OK, Json(CommentListResponse { comments, total })))
}
