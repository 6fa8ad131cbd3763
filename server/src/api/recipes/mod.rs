pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use crate::api::{optional_bounded_text, MAX_NAME_LENGTH};
use crate::error::ApiError;
use crate::models::{NewIngredient, NewRecipeIngredient, NewRecipeInstruction, Recipe, User};
use crate::schema::{ingredient, recipe, recipe_ingredient, recipe_instruction, recipe_sub_category};
use crate::AppState;
use axum::routing::get;
use axum::Router;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use utoipa::{OpenApi, ToSchema};

/// Longest accepted `quantity` or `unit`, matching the column width.
pub const MAX_MEASURE_LENGTH: usize = 50;

/// One ingredient line as sent by clients. The ingredient is referenced by
/// name and created in the catalog if it doesn't exist yet.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IngredientLineInput {
    pub name: String,
    pub quantity: Option<String>,
    pub unit: Option<String>,
}

#[derive(Debug, PartialEq)]
pub struct ValidatedLine<'a> {
    pub name: &'a str,
    pub quantity: Option<&'a str>,
    pub unit: Option<&'a str>,
}

fn measure<'a>(value: Option<&'a str>, field: &str) -> Result<Option<&'a str>, ApiError> {
    optional_bounded_text(value, field, MAX_MEASURE_LENGTH)
}

pub fn validate_ingredients(lines: &[IngredientLineInput]) -> Result<Vec<ValidatedLine<'_>>, ApiError> {
    let mut seen = HashSet::new();
    let mut validated = Vec::with_capacity(lines.len());

    for line in lines {
        let name = line.name.trim();
        if name.is_empty() {
            return Err(ApiError::BadRequest("Ingredient name cannot be empty".to_string()));
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(ApiError::BadRequest(format!(
                "Ingredient name must be at most {} characters",
                MAX_NAME_LENGTH
            )));
        }
        if !seen.insert(name.to_lowercase()) {
            return Err(ApiError::BadRequest(format!(
                "Ingredient '{}' is listed more than once",
                name
            )));
        }

        validated.push(ValidatedLine {
            name,
            quantity: measure(line.quantity.as_deref(), "Quantity")?,
            unit: measure(line.unit.as_deref(), "Unit")?,
        });
    }

    Ok(validated)
}

pub fn validate_instructions(steps: &[String]) -> Result<Vec<&str>, ApiError> {
    steps
        .iter()
        .enumerate()
        .map(|(i, step)| {
            let text = step.trim();
            if text.is_empty() {
                Err(ApiError::BadRequest(format!("Step {} cannot be empty", i + 1)))
            } else {
                Ok(text)
            }
        })
        .collect()
}

pub fn validate_non_negative(value: Option<i32>, field: &str) -> Result<(), ApiError> {
    match value {
        Some(v) if v < 0 => Err(ApiError::BadRequest(format!("{} cannot be negative", field))),
        _ => Ok(()),
    }
}

/// A sub-category must sit under the recipe's category when both are given.
pub fn check_sub_category(
    conn: &mut PgConnection,
    category_id: Option<i32>,
    sub_category_id: Option<i32>,
) -> Result<(), ApiError> {
    let Some(sub_category_id) = sub_category_id else {
        return Ok(());
    };

    let parent: Option<i32> = recipe_sub_category::table
        .find(sub_category_id)
        .select(recipe_sub_category::category_id)
        .first(conn)
        .optional()?;

    match (parent, category_id) {
        (None, _) => Err(ApiError::BadRequest("Unknown sub-category".to_string())),
        (Some(parent), Some(category_id)) if parent != category_id => Err(ApiError::BadRequest(
            "Sub-category does not belong to the selected category".to_string(),
        )),
        _ => Ok(()),
    }
}

pub fn find_recipe(conn: &mut PgConnection, recipe_id: i32) -> Result<Recipe, ApiError> {
    recipe::table
        .find(recipe_id)
        .select(Recipe::as_select())
        .first(conn)
        .optional()?
        .ok_or(ApiError::NotFound("Recipe"))
}

/// Only the author or an admin may change a recipe.
pub fn ensure_can_modify(user: &User, recipe: &Recipe) -> Result<(), ApiError> {
    if recipe.user_id == user.id || user.is_admin() {
        Ok(())
    } else {
        Err(ApiError::Forbidden("Only the author can modify this recipe"))
    }
}

/// Catalog id for `name`, inserting it if missing. Names match
/// case-insensitively; the first spelling stored wins.
pub fn upsert_ingredient(conn: &mut PgConnection, name: &str) -> QueryResult<i32> {
    // The only unique index besides the key is LOWER(name)
    diesel::insert_into(ingredient::table)
        .values(NewIngredient { name })
        .on_conflict_do_nothing()
        .execute(conn)?;

    ingredient::table
        .filter(crate::ingredient_name_matches!(name))
        .select(ingredient::ingredient_id)
        .first(conn)
}

pub fn replace_ingredient_lines(
    conn: &mut PgConnection,
    recipe_id: i32,
    lines: &[ValidatedLine<'_>],
) -> QueryResult<()> {
    diesel::delete(recipe_ingredient::table.filter(recipe_ingredient::recipe_id.eq(recipe_id)))
        .execute(conn)?;

    for line in lines {
        let ingredient_id = upsert_ingredient(conn, line.name)?;
        diesel::insert_into(recipe_ingredient::table)
            .values(NewRecipeIngredient {
                recipe_id,
                ingredient_id,
                quantity: line.quantity,
                unit: line.unit,
            })
            .execute(conn)?;
    }
    Ok(())
}

/// Replace all steps; they are renumbered from 1 in the given order.
pub fn replace_instructions(
    conn: &mut PgConnection,
    recipe_id: i32,
    steps: &[&str],
) -> QueryResult<()> {
    diesel::delete(recipe_instruction::table.filter(recipe_instruction::recipe_id.eq(recipe_id)))
        .execute(conn)?;

    let rows: Vec<NewRecipeInstruction> = steps
        .iter()
        .zip(1..)
        .map(|(text, step_number)| NewRecipeInstruction {
            recipe_id,
            step_number,
            instruction_text: *text,
        })
        .collect();

    if !rows.is_empty() {
        diesel::insert_into(recipe_instruction::table)
            .values(&rows)
            .execute(conn)?;
    }
    Ok(())
}

/// Returns the router for /api/recipes endpoints
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/recipes",
            get(list::list_recipes).post(create::create_recipe),
        )
        .route(
            "/api/recipes/{id}",
            get(get::get_recipe)
                .put(update::update_recipe)
                .delete(delete::delete_recipe),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create::create_recipe,
        list::list_recipes,
        get::get_recipe,
        update::update_recipe,
        delete::delete_recipe,
    ),
    components(schemas(
        IngredientLineInput,
        create::CreateRecipeRequest,
        list::ListRecipesResponse,
        list::RecipeSummary,
        get::RecipeResponse,
        get::IngredientLine,
        get::InstructionStep,
        update::UpdateRecipeRequest,
    ))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    fn line(name: &str, quantity: Option<&str>, unit: Option<&str>) -> IngredientLineInput {
        IngredientLineInput {
            name: name.to_string(),
            quantity: quantity.map(str::to_string),
            unit: unit.map(str::to_string),
        }
    }

    #[test]
    fn test_ingredients_are_trimmed_and_blanks_dropped() {
        let input = vec![line("  Flour ", Some(" 200 "), Some("  "))];
        let validated = validate_ingredients(&input).unwrap();
        assert_eq!(
            validated,
            vec![ValidatedLine {
                name: "Flour",
                quantity: Some("200"),
                unit: None,
            }]
        );
    }

    #[test]
    fn test_duplicate_ingredients_rejected_case_insensitively() {
        let input = vec![line("Sugar", None, None), line("sugar ", None, None)];
        assert!(validate_ingredients(&input).is_err());
    }

    #[test]
    fn test_empty_ingredient_name_rejected() {
        assert!(validate_ingredients(&[line("   ", None, None)]).is_err());
    }

    #[test]
    fn test_long_unit_rejected() {
        let unit = "x".repeat(MAX_MEASURE_LENGTH + 1);
        assert!(validate_ingredients(&[line("Salt", None, Some(&unit))]).is_err());
    }

    #[test]
    fn test_long_ingredient_name_rejected() {
        let name = "n".repeat(MAX_NAME_LENGTH + 1);
        let err = validate_ingredients(&[line(&name, None, None)]).unwrap_err();
        assert_eq!(err.to_string(), "Ingredient name must be at most 100 characters");
    }

    #[test]
    fn test_instructions_keep_order() {
        let steps = vec!["Mix".to_string(), " Bake ".to_string()];
        assert_eq!(validate_instructions(&steps).unwrap(), vec!["Mix", "Bake"]);
        assert!(validate_instructions(&["".to_string()]).is_err());
    }

    #[test]
    fn test_negative_minutes_rejected() {
        assert!(validate_non_negative(Some(-1), "Prep time").is_err());
        assert!(validate_non_negative(Some(0), "Prep time").is_ok());
        assert!(validate_non_negative(None, "Prep time").is_ok());
    }
}
