use super::get::{load_recipe_response, RecipeResponse};
use super::{
    check_sub_category, replace_ingredient_lines, replace_instructions, validate_ingredients,
    validate_instructions, validate_non_negative, IngredientLineInput,
};
use crate::api::{bounded_text, optional_text, ErrorResponse, MAX_TITLE_LENGTH};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::{NewRecipe, Recipe};
use crate::schema::recipe;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateRecipeRequest {
    pub title: String,
    pub description: Option<String>,
    pub category_id: Option<i32>,
    pub sub_category_id: Option<i32>,
    pub prep_time_minutes: Option<i32>,
    pub cook_time_minutes: Option<i32>,
    pub servings: Option<i32>,
    #[serde(default)]
    pub ingredients: Vec<IngredientLineInput>,
    /// Steps in order; numbered from 1 when stored
    #[serde(default)]
    pub instructions: Vec<String>,
}

#[utoipa::path(
    post,
    path = "/api/recipes",
    tag = "recipes",
    request_body(content = CreateRecipeRequest, example = json!({
        "title": "Pancakes",
        "servings": 4,
        "ingredients": [{"name": "Flour", "quantity": "200", "unit": "g"}, {"name": "Milk", "quantity": "300", "unit": "ml"}],
        "instructions": ["Whisk everything together", "Fry in a hot pan"]
    })),
    responses(
        (status = 201, description = "Recipe created", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn create_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(req): Json<CreateRecipeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let title = bounded_text(&req.title, "Title", MAX_TITLE_LENGTH)?;
    validate_non_negative(req.prep_time_minutes, "Prep time")?;
    validate_non_negative(req.cook_time_minutes, "Cook time")?;
    validate_non_negative(req.servings, "Servings")?;
    let lines = validate_ingredients(&req.ingredients)?;
    let steps = validate_instructions(&req.instructions)?;

    let mut conn = pool.get()?;

    let response = conn.transaction::<_, ApiError, _>(|conn| {
        check_sub_category(conn, req.category_id, req.sub_category_id)?;

        let created: Recipe = diesel::insert_into(recipe::table)
            .values(NewRecipe {
                user_id: user.id,
                category_id: req.category_id,
                sub_category_id: req.sub_category_id,
                title,
                description: optional_text(req.description.as_deref()),
                prep_time_minutes: req.prep_time_minutes,
                cook_time_minutes: req.cook_time_minutes,
                servings: req.servings,
            })
            .returning(Recipe::as_returning())
            .get_result(conn)?;

        replace_ingredient_lines(conn, created.recipe_id, &lines)?;
        replace_instructions(conn, created.recipe_id, &steps)?;

        Ok(load_recipe_response(conn, created)?)
    })?;

    tracing::info!(
        user_id = user.id,
        recipe_id = response.recipe_id,
        "Recipe created"
    );

    Ok((StatusCode::CREATED, Json(response)))
}
