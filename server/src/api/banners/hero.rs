use super::BannerResponse;
use crate::api::ErrorResponse;
use crate::auth::AdminUser;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::Banner;
use crate::schema::banner;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/banners/hero",
    tag = "banners",
    responses(
        (status = 200, description = "The hero banner", body = BannerResponse),
        (status = 404, description = "No hero banner set", body = ErrorResponse)
    )
)]
pub async fn get_hero(State(pool): State<Arc<DbPool>>) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    let hero: Banner = banner::table
        .filter(banner::is_hero.eq(true))
        .select(Banner::as_select())
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("Hero banner"))?;

    Ok((StatusCode::OK, Json(BannerResponse::from(hero))))
}

/// Make `banner_id` the hero. The partial unique index allows a single hero
/// row, so the old one is cleared first in the same transaction.
pub fn promote_to_hero(conn: &mut PgConnection, banner_id: i32) -> Result<Banner, ApiError> {
    conn.transaction::<_, ApiError, _>(|conn| {
        diesel::update(
            banner::table
                .filter(banner::is_hero.eq(true))
                .filter(banner::banner_id.ne(banner_id)),
        )
        .set(banner::is_hero.eq(false))
        .execute(conn)?;

        diesel::update(banner::table.find(banner_id))
            .set(banner::is_hero.eq(true))
            .returning(Banner::as_returning())
            .get_result(conn)
            .optional()?
            .ok_or(ApiError::NotFound("Banner"))
    })
}

#[utoipa::path(
    put,
    path = "/api/banners/{id}/hero",
    tag = "banners",
    params(
        ("id" = i32, Path, description = "Banner ID")
    ),
    responses(
        (status = 200, description = "Banner is now the hero", body = BannerResponse),
        (status = 403, description = "Admin access required", body = ErrorResponse),
        (status = 404, description = "Banner not found", body = ErrorResponse),
        (status = 409, description = "A concurrent request set another hero", body = ErrorResponse)
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn set_hero(
    AdminUser(admin): AdminUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;
    let hero = promote_to_hero(&mut conn, id)?;

    tracing::info!(admin_id = admin.id, banner_id = id, "Hero banner changed");

    Ok((StatusCode::OK, Json(BannerResponse::from(hero))))
}
