use crate::api::recipes::list::like_pattern;
use crate::api::{bounded_text, ErrorResponse, PageParams, MAX_NAME_LENGTH};
use crate::auth::AdminUser;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::{Ingredient, NewIngredient};
use crate::schema::ingredient;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
    Json, Router,
};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, OpenApi, ToSchema};

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListIngredientsParams {
    /// Case-insensitive name prefix
    pub q: Option<String>,
    /// Number of items to return (default: 20, max: 100)
    pub limit: Option<i64>,
    /// Number of items to skip (default: 0)
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateIngredientRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IngredientListResponse {
    pub ingredients: Vec<Ingredient>,
}

/// `like_pattern` wraps the term in `%`; a prefix search only wants the tail one.
fn prefix_pattern(term: &str) -> String {
    let pattern = like_pattern(term);
    pattern[1..].to_string()
}

#[utoipa::path(
    get,
    path = "/api/ingredients",
    tag = "ingredients",
    params(ListIngredientsParams),
    responses(
        (status = 200, description = "Catalog ingredients by name", body = IngredientListResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_ingredients(
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<ListIngredientsParams>,
) -> Result<impl IntoResponse, ApiError> {
    let page = PageParams {
        limit: params.limit,
        offset: params.offset,
    };
    let mut conn = pool.get()?;

    let mut query = ingredient::table.into_boxed();
    if let Some(q) = params.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        query = query.filter(ingredient::name.ilike(prefix_pattern(q)));
    }

    let ingredients: Vec<Ingredient> = query
        .order(ingredient::name.asc())
        .limit(page.limit())
        .offset(page.offset())
        .select(Ingredient::as_select())
        .load(&mut conn)?;

    Ok((StatusCode::OK, Json(IngredientListResponse { ingredients })))
}

#[utoipa::path(
    post,
    path = "/api/ingredients",
    tag = "ingredients",
    request_body = CreateIngredientRequest,
    responses(
        (status = 201, description = "Ingredient added to the catalog", body = Ingredient),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "Admin access required", body = ErrorResponse),
        (status = 409, description = "Ingredient already exists", body = ErrorResponse)
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn create_ingredient(
    AdminUser(_admin): AdminUser,
    State(pool): State<Arc<DbPool>>,
    Json(req): Json<CreateIngredientRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let name = bounded_text(&req.name, "Name", MAX_NAME_LENGTH)?;
    let mut conn = pool.get()?;

    let created: Ingredient = diesel::insert_into(ingredient::table)
        .values(NewIngredient { name })
        .returning(Ingredient::as_returning())
        .get_result(&mut conn)?;

    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    delete,
    path = "/api/ingredients/{id}",
    tag = "ingredients",
    params(
        ("id" = i32, Path, description = "Ingredient ID")
    ),
    responses(
        (status = 204, description = "Ingredient removed from the catalog"),
        (status = 403, description = "Admin access required", body = ErrorResponse),
        (status = 404, description = "Ingredient not found", body = ErrorResponse),
        (status = 409, description = "Ingredient is used by a recipe", body = ErrorResponse)
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn delete_ingredient(
    AdminUser(_admin): AdminUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    // Restricted by recipe_ingredient; a referenced ingredient maps to 409
    let removed = diesel::delete(ingredient::table.find(id)).execute(&mut conn)?;
    if removed == 0 {
        return Err(ApiError::NotFound("Ingredient"));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Returns the router for ingredient catalog endpoints
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/ingredients",
            get(list_ingredients).post(create_ingredient),
        )
        .route("/api/ingredients/{id}", delete(delete_ingredient))
}

#[derive(OpenApi)]
#[openapi(
    paths(list_ingredients, create_ingredient, delete_ingredient),
    components(schemas(Ingredient, CreateIngredientRequest, IngredientListResponse))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_pattern() {
        assert_eq!(prefix_pattern("tom"), "tom%");
        assert_eq!(prefix_pattern("50%"), "50\\%%");
    }
}
