use crate::api::public::auth::AuthResponse;
use crate::api::ErrorResponse;
use crate::auth::{cleared_session_cookie, AuthUser};
use crate::db::DbPool;
use crate::error::ApiError;
use crate::files::{delete_owned_files, EntityKind, FileOwner};
use crate::schema::{recipe, users};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use axum_extra::extract::CookieJar;
use diesel::prelude::*;
use std::sync::Arc;

#[utoipa::path(
    delete,
    path = "/api/users/me",
    tag = "users",
    responses(
        (status = 200, description = "Account deleted and session cookie cleared", body = AuthResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn delete_me(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    conn.transaction::<_, ApiError, _>(|conn| {
        // The cascade removes the recipes but not the files attached to them
        let recipe_ids: Vec<i32> = recipe::table
            .filter(recipe::user_id.eq(user.id))
            .select(recipe::recipe_id)
            .load(conn)?;

        for recipe_id in recipe_ids {
            delete_owned_files(conn, FileOwner::new(EntityKind::Recipe, recipe_id))?;
        }

        // Drop the reference first so the picture row can go with the rest
        diesel::update(users::table.find(user.id))
            .set(users::profile_picture_file_id.eq(None::<i32>))
            .execute(conn)?;
        delete_owned_files(conn, FileOwner::new(EntityKind::User, user.id))?;

        diesel::delete(users::table.find(user.id)).execute(conn)?;
        Ok(())
    })?;

    tracing::info!(user_id = user.id, "User deleted account");

    Ok((
        StatusCode::OK,
        jar.add(cleared_session_cookie()),
        Json(AuthResponse::message("Account deleted")),
    ))
}

