pub mod hero;
pub mod manage;

use crate::api::ErrorResponse;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::Banner;
use crate::schema::banner;
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BannerResponse {
    pub banner_id: i32,
    pub title: String,
    pub image_url: String,
    pub keywords: Vec<String>,
    pub is_hero: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Banner> for BannerResponse {
    fn from(banner: Banner) -> Self {
        Self {
            banner_id: banner.banner_id,
            title: banner.title,
            image_url: banner.image_url,
            keywords: banner.keywords.into_iter().flatten().collect(),
            is_hero: banner.is_hero,
            created_at: banner.created_at,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/banners",
    tag = "banners",
    responses(
        (status = 200, description = "All banners, hero first", body = Vec<BannerResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_banners(State(pool): State<Arc<DbPool>>) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    let banners: Vec<BannerResponse> = banner::table
        .order((banner::is_hero.desc(), banner::created_at.desc()))
        .select(Banner::as_select())
        .load(&mut conn)?
        .into_iter()
        .map(BannerResponse::from)
        .collect();

    Ok((StatusCode::OK, Json(banners)))
}

/// Returns the router for banner endpoints
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/banners",
            get(list_banners).post(manage::create_banner),
        )
        .route("/api/banners/hero", get(hero::get_hero))
        .route("/api/banners/{id}", delete(manage::delete_banner))
        .route("/api/banners/{id}/hero", put(hero::set_hero))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list_banners,
        hero::get_hero,
        hero::set_hero,
        manage::create_banner,
        manage::delete_banner,
    ),
    components(schemas(BannerResponse, manage::CreateBannerRequest))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_keywords_are_dropped() {
        let banner = Banner {
            banner_id: 1,
            title: "Summer".to_string(),
            image_url: "/api/files/3".to_string(),
            keywords: vec![Some("bbq".to_string()), None, Some("salad".to_string())],
            is_hero: true,
            created_at: Utc::now(),
        };
        let response = BannerResponse::from(banner);
        assert_eq!(response.keywords, vec!["bbq", "salad"]);
    }
}
