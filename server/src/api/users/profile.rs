use crate::api::ErrorResponse;
use crate::auth::find_user_by_id;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::files::file_url;
use crate::raw_sql::{ProfileCounts, PROFILE_COUNTS_QUERY};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::Integer;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

/// Public view of a user. Email is left out.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub id: i32,
    pub name: String,
    pub profile_picture_url: Option<String>,
    pub follower_count: i64,
    pub following_count: i64,
    pub recipe_count: i64,
    pub created_at: DateTime<Utc>,
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "users",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Public profile", body = ProfileResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn get_profile(
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    let user = find_user_by_id(&mut conn, id)?.ok_or(ApiError::NotFound("User"))?;

    let counts: ProfileCounts = diesel::sql_query(PROFILE_COUNTS_QUERY)
        .bind::<Integer, _>(user.id)
        .get_result(&mut conn)?;

    Ok((
        StatusCode::OK,
        Json(ProfileResponse {
            id: user.id,
            name: user.name,
            profile_picture_url: user.profile_picture_file_id.map(file_url),
            follower_count: counts.follower_count,
            following_count: counts.following_count,
            recipe_count: counts.recipe_count,
            created_at: user.created_at,
        }),
    ))
}
