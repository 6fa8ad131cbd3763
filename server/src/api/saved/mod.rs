use crate::api::recipes::find_recipe;
use crate::api::recipes::list::{summarize, RecipeSummary};
use crate::api::{ErrorResponse, PageParams};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::{NewSaveRecipe, Recipe};
use crate::schema::{recipe, save_recipe};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SaveResponse {
    pub recipe_id: i32,
    pub saved: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SavedRecipesResponse {
    pub recipes: Vec<RecipeSummary>,
    pub total: i64,
}

#[utoipa::path(
    post,
    path = "/api/recipes/{id}/save",
    tag = "saved",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    responses(
        (status = 201, description = "Recipe saved", body = SaveResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse),
        (status = 409, description = "Recipe already saved", body = ErrorResponse)
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn save(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;
    find_recipe(&mut conn, id)?;

    diesel::insert_into(save_recipe::table)
        .values(NewSaveRecipe {
            user_id: user.id,
            recipe_id: id,
        })
        .execute(&mut conn)?;

    Ok((
        StatusCode::CREATED,
        Json(SaveResponse {
            recipe_id: id,
            saved: true,
        }),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/save",
    tag = "saved",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Recipe unsaved", body = SaveResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe was not saved", body = ErrorResponse)
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn unsave(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    let removed = diesel::delete(
        save_recipe::table
            .filter(save_recipe::user_id.eq(user.id))
            .filter(save_recipe::recipe_id.eq(id)),
    )
    .execute(&mut conn)?;

    if removed == 0 {
        return Err(ApiError::NotFound("Saved recipe"));
    }

    Ok((
        StatusCode::OK,
        Json(SaveResponse {
            recipe_id: id,
            saved: false,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/saved-recipes",
    tag = "saved",
    params(PageParams),
    responses(
        (status = 200, description = "Recipes the current user saved, most recent first", body = SavedRecipesResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn list_saved(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Query(page): Query<PageParams>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    let total: i64 = save_recipe::table
        .filter(save_recipe::user_id.eq(user.id))
        .count()
        .get_result(&mut conn)?;

    let recipes: Vec<Recipe> = save_recipe::table
        .inner_join(recipe::table)
        .filter(save_recipe::user_id.eq(user.id))
        .order(save_recipe::created_at.desc())
        .limit(page.limit())
        .offset(page.offset())
        .select(Recipe::as_select())
        .load(&mut conn)?;

    let recipes = summarize(&mut conn, recipes)?;

    Ok((StatusCode::OK, Json(SavedRecipesResponse { recipes, total })))
}

/// Returns the router for saved-recipe endpoints
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/recipes/{id}/save",
            post(save).delete(unsave),
        )
        .route("/api/saved-recipes", get(list_saved))
}

#[derive(OpenApi)]
#[openapi(
    paths(save, unsave, list_saved),
    components(schemas(SaveResponse, SavedRecipesResponse))
)]
pub struct ApiDoc;
