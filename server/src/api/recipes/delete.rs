use super::{ensure_can_modify, find_recipe};
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::files::{delete_owned_files, EntityKind, FileOwner};
use crate::schema::recipe;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use diesel::prelude::*;
use std::sync::Arc;

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn delete_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    conn.transaction::<_, ApiError, _>(|conn| {
        let existing = find_recipe(conn, id)?;
        ensure_can_modify(&user, &existing)?;

        // Lines, comments, likes and saves go with the cascade; files don't
        delete_owned_files(conn, FileOwner::new(EntityKind::Recipe, id))?;
        diesel::delete(recipe::table.find(id)).execute(conn)?;
        Ok(())
    })?;

    tracing::info!(user_id = user.id, recipe_id = id, "Recipe deleted");

    Ok(StatusCode::NO_CONTENT)
}
