use super::SubCategoryResponse;
use crate::api::{bounded_text, optional_text, ErrorResponse, MAX_NAME_LENGTH};
use crate::auth::AdminUser;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::{NewRecipeSubCategory, RecipeSubCategory};
use crate::schema::{recipe_category, recipe_sub_category};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::dsl::exists;
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SubCategoryRequest {
    pub name: String,
    pub description: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/categories/{id}/sub-categories",
    tag = "categories",
    params(
        ("id" = i32, Path, description = "Parent category ID")
    ),
    request_body = SubCategoryRequest,
    responses(
        (status = 201, description = "Sub-category created", body = SubCategoryResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "Admin access required", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 409, description = "Name already used in this category", body = ErrorResponse)
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn create_sub_category(
    AdminUser(_admin): AdminUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<i32>,
    Json(req): Json<SubCategoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let name = bounded_text(&req.name, "Name", MAX_NAME_LENGTH)?;
    let mut conn = pool.get()?;

    let parent_exists: bool =
        diesel::select(exists(recipe_category::table.find(id))).get_result(&mut conn)?;
    if !parent_exists {
        return Err(ApiError::NotFound("Category"));
    }

    let created: RecipeSubCategory = diesel::insert_into(recipe_sub_category::table)
        .values(NewRecipeSubCategory {
            category_id: id,
            name,
            description: optional_text(req.description.as_deref()),
        })
        .returning(RecipeSubCategory::as_returning())
        .get_result(&mut conn)?;

    Ok((StatusCode::CREATED, Json(SubCategoryResponse::from(created))))
}

#[utoipa::path(
    delete,
    path = "/api/sub-categories/{id}",
    tag = "categories",
    params(
        ("id" = i32, Path, description = "Sub-category ID")
    ),
    responses(
        (status = 204, description = "Sub-category deleted"),
        (status = 403, description = "Admin access required", body = ErrorResponse),
        (status = 404, description = "Sub-category not found", body = ErrorResponse)
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn delete_sub_category(
    AdminUser(_admin): AdminUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    let removed = diesel::delete(recipe_sub_category::table.find(id)).execute(&mut conn)?;
    if removed == 0 {
        return Err(ApiError::NotFound("Sub-category"));
    }

    Ok(StatusCode::NO_CONTENT)
}
