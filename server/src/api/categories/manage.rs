use super::{CategoryResponse, SubCategoryResponse};
use crate::api::{
    bounded_text, optional_bounded_text, optional_text, ErrorResponse, MAX_NAME_LENGTH,
    MAX_URL_LENGTH,
};
use crate::auth::AdminUser;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::files::{delete_owned_files, EntityKind, FileOwner};
use crate::models::{NewRecipeCategory, RecipeCategory, RecipeSubCategory};
use crate::schema::{recipe_category, recipe_sub_category};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CategoryRequest {
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

impl CategoryRequest {
    fn validated(&self) -> Result<NewRecipeCategory<'_>, ApiError> {
        Ok(NewRecipeCategory {
            name: bounded_text(&self.name, "Name", MAX_NAME_LENGTH)?,
            description: optional_text(self.description.as_deref()),
            image_url: optional_bounded_text(
                self.image_url.as_deref(),
                "Image URL",
                MAX_URL_LENGTH,
            )?,
        })
    }
}

fn sub_categories_of(
    conn: &mut PgConnection,
    category_id: i32,
) -> QueryResult<Vec<SubCategoryResponse>> {
    Ok(recipe_sub_category::table
        .filter(recipe_sub_category::category_id.eq(category_id))
        .order(recipe_sub_category::name.asc())
        .select(RecipeSubCategory::as_select())
        .load(conn)?
        .into_iter()
        .map(SubCategoryResponse::from)
        .collect())
}

#[utoipa::path(
    post,
    path = "/api/categories",
    tag = "categories",
    request_body(content = CategoryRequest, example = json!({"name": "Desserts", "description": "Sweet things"})),
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "Admin access required", body = ErrorResponse),
        (status = 409, description = "Category already exists", body = ErrorResponse)
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn create_category(
    AdminUser(admin): AdminUser,
    State(pool): State<Arc<DbPool>>,
    Json(req): Json<CategoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let new_category = req.validated()?;
    let mut conn = pool.get()?;

    let created: RecipeCategory = diesel::insert_into(recipe_category::table)
        .values(&new_category)
        .returning(RecipeCategory::as_returning())
        .get_result(&mut conn)?;

    tracing::info!(
        admin_id = admin.id,
        category_id = created.category_id,
        "Category created"
    );

    Ok((
        StatusCode::CREATED,
        Json(CategoryResponse::new(created, Vec::new())),
    ))
}

#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    tag = "categories",
    params(
        ("id" = i32, Path, description = "Category ID")
    ),
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Category replaced", body = CategoryResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "Admin access required", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 409, description = "Category name taken", body = ErrorResponse)
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn update_category(
    AdminUser(_admin): AdminUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<i32>,
    Json(req): Json<CategoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let changes = req.validated()?;
    let mut conn = pool.get()?;

    // A full replacement: omitted optional fields are cleared
    let updated: RecipeCategory = diesel::update(recipe_category::table.find(id))
        .set((
            recipe_category::name.eq(changes.name),
            recipe_category::description.eq(changes.description),
            recipe_category::image_url.eq(changes.image_url),
        ))
        .returning(RecipeCategory::as_returning())
        .get_result(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("Category"))?;

    let subs = sub_categories_of(&mut conn, id)?;

    Ok((StatusCode::OK, Json(CategoryResponse::new(updated, subs))))
}

#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    tag = "categories",
    params(
        ("id" = i32, Path, description = "Category ID")
    ),
    responses(
        (status = 204, description = "Category and its sub-categories deleted"),
        (status = 403, description = "Admin access required", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse)
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn delete_category(
    AdminUser(admin): AdminUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    conn.transaction::<_, ApiError, _>(|conn| {
        // Sub-categories cascade; recipes keep existing with the category unset
        let removed = diesel::delete(recipe_category::table.find(id)).execute(conn)?;
        if removed == 0 {
            return Err(ApiError::NotFound("Category"));
        }
        delete_owned_files(conn, FileOwner::new(EntityKind::RecipeCategory, id))?;
        Ok(())
    })?;

    tracing::info!(admin_id = admin.id, category_id = id, "Category deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_optional_fields_become_null() {
        let req = CategoryRequest {
            name: " Desserts ".to_string(),
            description: Some("   ".to_string()),
            image_url: None,
        };
        let new_category = req.validated().unwrap();
        assert_eq!(new_category.name, "Desserts");
        assert_eq!(new_category.description, None);
        assert_eq!(new_category.image_url, None);
    }

    #[test]
    fn test_blank_name_rejected() {
        let req = CategoryRequest {
            name: "".to_string(),
            description: None,
            image_url: None,
        };
        assert!(req.validated().is_err());
    }

    #[test]
    fn test_over_long_fields_rejected() {
        let req = CategoryRequest {
            name: "d".repeat(MAX_NAME_LENGTH + 1),
            description: None,
            image_url: None,
        };
        let err = req.validated().unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);

        let req = CategoryRequest {
            name: "Desserts".to_string(),
            description: Some("x".repeat(10_000)),
            image_url: Some(format!("https://cdn.example.com/{}", "p".repeat(MAX_URL_LENGTH))),
        };
        let err = req.validated().unwrap_err();
        assert_eq!(err.to_string(), "Image URL must be at most 500 characters");
    }
}
