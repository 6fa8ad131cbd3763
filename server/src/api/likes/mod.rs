use crate::api::recipes::find_recipe;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::NewLike;
use crate::schema::likes;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LikeResponse {
    pub recipe_id: i32,
    pub liked: bool,
    pub like_count: i64,
}

fn like_count(conn: &mut PgConnection, recipe_id: i32) -> QueryResult<i64> {
    likes::table
        .filter(likes::recipe_id.eq(recipe_id))
        .count()
        .get_result(conn)
}

#[utoipa::path(
    post,
    path = "/api/recipes/{id}/like",
    tag = "likes",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    responses(
        (status = 201, description = "Recipe liked", body = LikeResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse),
        (status = 409, description = "Recipe already liked", body = ErrorResponse)
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn like_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;
    find_recipe(&mut conn, id)?;

    diesel::insert_into(likes::table)
        .values(NewLike {
            user_id: user.id,
            recipe_id: id,
        })
        .execute(&mut conn)?;

    Ok((
        StatusCode::CREATED,
        Json(LikeResponse {
            recipe_id: id,
            liked: true,
            like_count: like_count(&mut conn, id)?,
        }),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/like",
    tag = "likes",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Like removed", body = LikeResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe was not liked", body = ErrorResponse)
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn unlike_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    let removed = diesel::delete(
        likes::table
            .filter(likes::user_id.eq(user.id))
            .filter(likes::recipe_id.eq(id)),
    )
    .execute(&mut conn)?;

    if removed == 0 {
        return Err(ApiError::NotFound("Like"));
    }

    Ok((
        StatusCode::OK,
        Json(LikeResponse {
            recipe_id: id,
            liked: false,
            like_count: like_count(&mut conn, id)?,
        }),
    ))
}

/// Returns the router for like endpoints
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/api/recipes/{id}/like",
        post(like_recipe).delete(unlike_recipe),
    )
}

#[derive(OpenApi)]
#[openapi(paths(like_recipe, unlike_recipe), components(schemas(LikeResponse)))]
pub struct ApiDoc;
