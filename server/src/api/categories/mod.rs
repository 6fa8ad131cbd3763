pub mod manage;
pub mod sub_categories;

use crate::api::ErrorResponse;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::{RecipeCategory, RecipeSubCategory};
use crate::schema::{recipe_category, recipe_sub_category};
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubCategoryResponse {
    pub sub_category_id: i32,
    pub category_id: i32,
    pub name: String,
    pub description: Option<String>,
}

impl From<RecipeSubCategory> for SubCategoryResponse {
    fn from(sub: RecipeSubCategory) -> Self {
        Self {
            sub_category_id: sub.sub_category_id,
            category_id: sub.category_id,
            name: sub.name,
            description: sub.description,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponse {
    pub category_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub sub_categories: Vec<SubCategoryResponse>,
}

impl CategoryResponse {
    pub fn new(category: RecipeCategory, sub_categories: Vec<SubCategoryResponse>) -> Self {
        Self {
            category_id: category.category_id,
            name: category.name,
            description: category.description,
            image_url: category.image_url,
            sub_categories,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "categories",
    responses(
        (status = 200, description = "All categories with their sub-categories, by name", body = Vec<CategoryResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_categories(
    State(pool): State<Arc<DbPool>>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    let categories: Vec<RecipeCategory> = recipe_category::table
        .order(recipe_category::name.asc())
        .select(RecipeCategory::as_select())
        .load(&mut conn)?;

    let mut subs_by_category: HashMap<i32, Vec<SubCategoryResponse>> = HashMap::new();
    for sub in recipe_sub_category::table
        .order(recipe_sub_category::name.asc())
        .select(RecipeSubCategory::as_select())
        .load(&mut conn)?
    {
        subs_by_category
            .entry(sub.category_id)
            .or_default()
            .push(sub.into());
    }

    let response: Vec<CategoryResponse> = categories
        .into_iter()
        .map(|c| {
            let subs = subs_by_category.remove(&c.category_id).unwrap_or_default();
            CategoryResponse::new(c, subs)
        })
        .collect();

    Ok((StatusCode::OK, Json(response)))
}

/// Returns the router for category endpoints
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/categories",
            get(list_categories).post(manage::create_category),
        )
        .route(
            "/api/categories/{id}",
            put(manage::update_category).delete(manage::delete_category),
        )
        .route(
            "/api/categories/{id}/sub-categories",
            post(sub_categories::create_sub_category),
        )
        .route(
            "/api/sub-categories/{id}",
            delete(sub_categories::delete_sub_category),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list_categories,
        manage::create_category,
        manage::update_category,
        manage::delete_category,
        sub_categories::create_sub_category,
        sub_categories::delete_sub_category,
    ),
    components(schemas(
        CategoryResponse,
        SubCategoryResponse,
        manage::CategoryRequest,
        sub_categories::SubCategoryRequest,
    ))
)]
pub struct ApiDoc;
