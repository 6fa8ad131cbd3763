use crate::api::{ErrorResponse, PageParams};
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::Recipe;
use crate::schema::{likes, recipe, users};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use diesel::dsl::count_star;
use diesel::pg::Pg;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListRecipesParams {
    /// Number of items to return (default: 20, max: 100)
    pub limit: Option<i64>,
    /// Number of items to skip (default: 0)
    pub offset: Option<i64>,
    /// Only recipes in this category
    pub category_id: Option<i32>,
    /// Only recipes by this author
    pub user_id: Option<i32>,
    /// Case-insensitive substring match on the title
    pub q: Option<String>,
}

impl ListRecipesParams {
    fn page(&self) -> PageParams {
        PageParams {
            limit: self.limit,
            offset: self.offset,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecipeSummary {
    pub recipe_id: i32,
    pub user_id: i32,
    pub author_name: String,
    pub category_id: Option<i32>,
    pub sub_category_id: Option<i32>,
    pub title: String,
    pub description: Option<String>,
    pub like_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListRecipesResponse {
    pub recipes: Vec<RecipeSummary>,
    pub total: i64,
}

/// Escape LIKE wildcards so user input only matches literally.
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn filtered(params: &ListRecipesParams) -> recipe::BoxedQuery<'static, Pg> {
    let mut query = recipe::table.into_boxed();

    if let Some(category_id) = params.category_id {
        query = query.filter(recipe::category_id.eq(category_id));
    }
    if let Some(user_id) = params.user_id {
        query = query.filter(recipe::user_id.eq(user_id));
    }
    if let Some(q) = params.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        query = query.filter(recipe::title.ilike(like_pattern(q)));
    }

    query
}

/// Attach author names and like counts to a page of recipes, keeping order.
pub fn summarize(conn: &mut PgConnection, recipes: Vec<Recipe>) -> QueryResult<Vec<RecipeSummary>> {
    let recipe_ids: Vec<i32> = recipes.iter().map(|r| r.recipe_id).collect();
    let user_ids: Vec<i32> = recipes.iter().map(|r| r.user_id).collect();

    let authors: HashMap<i32, String> = users::table
        .filter(users::id.eq_any(&user_ids))
        .select((users::id, users::name))
        .load::<(i32, String)>(conn)?
        .into_iter()
        .collect();

    let like_counts: HashMap<i32, i64> = likes::table
        .filter(likes::recipe_id.eq_any(&recipe_ids))
        .group_by(likes::recipe_id)
        .select((likes::recipe_id, count_star()))
        .load::<(i32, i64)>(conn)?
        .into_iter()
        .collect();

    Ok(recipes
        .into_iter()
        .map(|r| RecipeSummary {
            recipe_id: r.recipe_id,
            user_id: r.user_id,
            author_name: authors.get(&r.user_id).cloned().unwrap_or_default(),
            category_id: r.category_id,
            sub_category_id: r.sub_category_id,
            like_count: like_counts.get(&r.recipe_id).copied().unwrap_or(0),
            title: r.title,
            description: r.description,
            created_at: r.created_at,
        })
        .collect())
}

#[utoipa::path(
    get,
    path = "/api/recipes",
    tag = "recipes",
    params(ListRecipesParams),
    responses(
        (status = 200, description = "Recipes, newest first", body = ListRecipesResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_recipes(
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<ListRecipesParams>,
) -> Result<impl IntoResponse, ApiError> {
    let page = params.page();
    let mut conn = pool.get()?;

    let total: i64 = filtered(&params).count().get_result(&mut conn)?;

    let recipes: Vec<Recipe> = filtered(&params)
        .order((recipe::created_at.desc(), recipe::recipe_id.desc()))
        .limit(page.limit())
        .offset(page.offset())
        .select(Recipe::as_select())
        .load(&mut conn)?;

    let recipes = summarize(&mut conn, recipes)?;

    Ok((StatusCode::OK, Json(ListRecipesResponse { recipes, total })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("cake"), "%cake%");
        assert_eq!(like_pattern("100%_rye"), "%100\\%\\_rye%");
    }
}
