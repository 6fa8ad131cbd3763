use crate::api::ErrorResponse;
use crate::auth::{find_user_by_id, AuthUser};
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::NewFollower;
use crate::schema::followers;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FollowResponse {
    pub user_id: i32,
    pub following: bool,
}

#[utoipa::path(
    post,
    path = "/api/users/{id}/follow",
    tag = "followers",
    params(
        ("id" = i32, Path, description = "User to follow")
    ),
    responses(
        (status = 201, description = "Now following", body = FollowResponse),
        (status = 400, description = "Cannot follow yourself", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "Already following", body = ErrorResponse)
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn follow_user(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    // The table has a CHECK for this too; answer before hitting it
    if id == user.id {
        return Err(ApiError::BadRequest("You cannot follow yourself".to_string()));
    }

    let mut conn = pool.get()?;
    find_user_by_id(&mut conn, id)?.ok_or(ApiError::NotFound("User"))?;

    diesel::insert_into(followers::table)
        .values(NewFollower {
            user_id: id,
            follower_user_id: user.id,
        })
        .execute(&mut conn)?;

    Ok((
        StatusCode::CREATED,
        Json(FollowResponse {
            user_id: id,
            following: true,
        }),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}/follow",
    tag = "followers",
    params(
        ("id" = i32, Path, description = "User to unfollow")
    ),
    responses(
        (status = 200, description = "No longer following", body = FollowResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Not following this user", body = ErrorResponse)
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn unfollow_user(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    let removed = diesel::delete(
        followers::table
            .filter(followers::user_id.eq(id))
            .filter(followers::follower_user_id.eq(user.id)),
    )
    .execute(&mut conn)?;

    if removed == 0 {
        return Err(ApiError::NotFound("Follow"));
    }

    Ok((
        StatusCode::OK,
        Json(FollowResponse {
            user_id: id,
            following: false,
        }),
    ))
}
