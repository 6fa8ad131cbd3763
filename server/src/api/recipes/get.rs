use super::find_recipe;
use crate::api::ErrorResponse;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::Recipe;
use crate::schema::{comment, ingredient, likes, recipe_ingredient, recipe_instruction, users};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IngredientLine {
    pub ingredient_id: i32,
    pub name: String,
    pub quantity: Option<String>,
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InstructionStep {
    pub step_number: i32,
    pub instruction_text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecipeResponse {
    pub recipe_id: i32,
    pub user_id: i32,
    pub author_name: String,
    pub category_id: Option<i32>,
    pub sub_category_id: Option<i32>,
    pub title: String,
    pub description: Option<String>,
    pub prep_time_minutes: Option<i32>,
    pub cook_time_minutes: Option<i32>,
    pub servings: Option<i32>,
    pub ingredients: Vec<IngredientLine>,
    /// Ordered by step number
    pub instructions: Vec<InstructionStep>,
    pub like_count: i64,
    pub comment_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Assemble the full view of `recipe` with its lines and counters.
pub fn load_recipe_response(
    conn: &mut PgConnection,
    recipe: Recipe,
) -> QueryResult<RecipeResponse> {
    let author_name: String = users::table
        .find(recipe.user_id)
        .select(users::name)
        .first(conn)?;

    let ingredients = recipe_ingredient::table
        .inner_join(ingredient::table)
        .filter(recipe_ingredient::recipe_id.eq(recipe.recipe_id))
        .order(recipe_ingredient::recipe_ingredient_id.asc())
        .select((
            ingredient::ingredient_id,
            ingredient::name,
            recipe_ingredient::quantity,
            recipe_ingredient::unit,
        ))
        .load::<(i32, String, Option<String>, Option<String>)>(conn)?
        .into_iter()
        .map(|(ingredient_id, name, quantity, unit)| IngredientLine {
            ingredient_id,
            name,
            quantity,
            unit,
        })
        .collect();

    let instructions = recipe_instruction::table
        .filter(recipe_instruction::recipe_id.eq(recipe.recipe_id))
        .order(recipe_instruction::step_number.asc())
        .select((
            recipe_instruction::step_number,
            recipe_instruction::instruction_text,
        ))
        .load::<(i32, String)>(conn)?
        .into_iter()
        .map(|(step_number, instruction_text)| InstructionStep {
            step_number,
            instruction_text,
        })
        .collect();

    let like_count: i64 = likes::table
        .filter(likes::recipe_id.eq(recipe.recipe_id))
        .count()
        .get_result(conn)?;

    let comment_count: i64 = comment::table
        .filter(comment::recipe_id.eq(recipe.recipe_id))
        .count()
        .get_result(conn)?;

    Ok(RecipeResponse {
        recipe_id: recipe.recipe_id,
        user_id: recipe.user_id,
        author_name,
        category_id: recipe.category_id,
        sub_category_id: recipe.sub_category_id,
        title: recipe.title,
        description: recipe.description,
        prep_time_minutes: recipe.prep_time_minutes,
        cook_time_minutes: recipe.cook_time_minutes,
        servings: recipe.servings,
        ingredients,
        instructions,
        like_count,
        comment_count,
        created_at: recipe.created_at,
        updated_at: recipe.updated_at,
    })
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Recipe details", body = RecipeResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn get_recipe(
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;
    let recipe = find_recipe(&mut conn, id)?;
    let response = load_recipe_response(&mut conn, recipe)?;

    Ok((StatusCode::OK, Json(response)))
}
