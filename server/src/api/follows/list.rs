use crate::api::{ErrorResponse, PageParams};
use crate::auth::find_user_by_id;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::files::file_url;
use crate::schema::{followers, users};
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

/// Minimal public user, used in follower and comment listings.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserSummary {
    pub id: i32,
    pub name: String,
    pub profile_picture_url: Option<String>,
}

impl UserSummary {
    pub fn new(id: i32, name: String, profile_picture_file_id: Option<i32>) -> Self {
        Self {
            id,
            name,
            profile_picture_url: profile_picture_file_id.map(file_url),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FollowListResponse {
    pub users: Vec<UserSummary>,
    pub total: i64,
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    /// Users following `id`
    Followers,
    /// Users `id` follows
    Following,
}

fn load_follow_list(
    conn: &mut PgConnection,
    id: i32,
    direction: Direction,
    page: &PageParams,
) -> Result<FollowListResponse, ApiError> {
    find_user_by_id(conn, id)?.ok_or(ApiError::NotFound("User"))?;

    let (rows, total) = match direction {
        Direction::Followers => {
            let total: i64 = followers::table
                .filter(followers::user_id.eq(id))
                .count()
                .get_result(conn)?;
            let rows: Vec<(i32, String, Option<i32>)> = followers::table
                .inner_join(users::table.on(users::id.eq(followers::follower_user_id)))
                .filter(followers::user_id.eq(id))
                .order(followers::created_at.desc())
                .limit(page.limit())
                .offset(page.offset())
                .select((users::id, users::name, users::profile_picture_file_id))
                .load(conn)?;
            (rows, total)
        }
        Direction::Following => {
            let total: i64 = followers::table
                .filter(followers::follower_user_id.eq(id))
                .count()
                .get_result(conn)?;
            let rows: Vec<(i32, String, Option<i32>)> = followers::table
                .inner_join(users::table.on(users::id.eq(followers::user_id)))
                .filter(followers::follower_user_id.eq(id))
                .order(followers::created_at.desc())
                .limit(page.limit())
                .offset(page.offset())
                .select((users::id, users::name, users::profile_picture_file_id))
                .load(conn)?;
            (rows, total)
        }
    };

    Ok(FollowListResponse {
        users: rows
            .into_iter()
            .map(|(id, name, picture)| UserSummary::new(id, name, picture))
            .collect(),
        total,
    })
}

#[utoipa::path(
    get,
    path = "/api/users/{id}/followers",
    tag = "followers",
    params(
        ("id" = i32, Path, description = "User ID"),
        PageParams
    ),
    responses(
        (status = 200, description = "Users following this user", body = FollowListResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn list_followers(
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<i32>,
    Query(page): Query<PageParams>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;
    let response = load_follow_list(&mut conn, id, Direction::Followers, &page)?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}/following",
    tag = "followers",
    params(
        ("id" = i32, Path, description = "User ID"),
        PageParams
    ),
    responses(
        (status = 200, description = "Users this user follows", body = FollowListResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn list_following(
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<i32>,
    Query(page): Query<PageParams>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;
    let response = load_follow_list(&mut conn, id, Direction::Following, &page)?;
    Ok((StatusCode::OK, Json(response)))
}
