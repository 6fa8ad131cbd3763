use super::get::{load_recipe_response, RecipeResponse};
use super::{
    check_sub_category, ensure_can_modify, find_recipe, replace_ingredient_lines,
    replace_instructions, validate_ingredients, validate_instructions, validate_non_negative,
    IngredientLineInput,
};
use crate::api::{bounded_text, nullable, optional_text, ErrorResponse, MAX_TITLE_LENGTH};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::{Recipe, RecipeChanges};
use crate::schema::recipe;
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

/// Fields left out are unchanged. Nullable fields are cleared with `null`.
/// `ingredients` and `instructions` replace the whole list when present.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateRecipeRequest {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<i32>)]
    pub category_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<i32>)]
    pub sub_category_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<i32>)]
    pub prep_time_minutes: Option<Option<i32>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<i32>)]
    pub cook_time_minutes: Option<Option<i32>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<i32>)]
    pub servings: Option<Option<i32>>,
    pub ingredients: Option<Vec<IngredientLineInput>>,
    pub instructions: Option<Vec<String>>,
}

impl UpdateRecipeRequest {
    fn has_column_changes(&self) -> bool {
        self.title.is_some()
            || self.description.is_some()
            || self.category_id.is_some()
            || self.sub_category_id.is_some()
            || self.prep_time_minutes.is_some()
            || self.cook_time_minutes.is_some()
            || self.servings.is_some()
    }
}

#[utoipa::path(
    put,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    request_body = UpdateRecipeRequest,
    responses(
        (status = 200, description = "Recipe updated", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn update_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<i32>,
    Json(req): Json<UpdateRecipeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let title = req
        .title
        .as_deref()
        .map(|t| bounded_text(t, "Title", MAX_TITLE_LENGTH))
        .transpose()?;
    for (value, field) in [
        (req.prep_time_minutes, "Prep time"),
        (req.cook_time_minutes, "Cook time"),
        (req.servings, "Servings"),
    ] {
        validate_non_negative(value.flatten(), field)?;
    }
    let lines = req
        .ingredients
        .as_deref()
        .map(validate_ingredients)
        .transpose()?;
    let steps = req
        .instructions
        .as_deref()
        .map(validate_instructions)
        .transpose()?;

    let mut conn = pool.get()?;

    let response = conn.transaction::<_, ApiError, _>(|conn| {
        let existing = find_recipe(conn, id)?;
        ensure_can_modify(&user, &existing)?;

        let category_id = req.category_id.unwrap_or(existing.category_id);
        let sub_category_id = req.sub_category_id.unwrap_or(existing.sub_category_id);
        check_sub_category(conn, category_id, sub_category_id)?;

        let updated = if req.has_column_changes() {
            let changes = RecipeChanges {
                category_id: req.category_id,
                sub_category_id: req.sub_category_id,
                title,
                description: req
                    .description
                    .as_ref()
                    .map(|d| optional_text(d.as_deref())),
                prep_time_minutes: req.prep_time_minutes,
                cook_time_minutes: req.cook_time_minutes,
                servings: req.servings,
            };

            diesel::update(recipe::table.find(id))
                .set(&changes)
                .returning(Recipe::as_returning())
                .get_result(conn)?
        } else {
            existing
        };

        if let Some(lines) = &lines {
            replace_ingredient_lines(conn, id, lines)?;
        }
        if let Some(steps) = &steps {
            replace_instructions(conn, id, steps)?;
        }

        Ok(load_recipe_response(conn, updated)?)
    })?;

    tracing::info!(user_id = user.id, recipe_id = id, "Recipe updated");

    Ok((StatusCode::OK, Json(response)))
}
