use super::BannerResponse;
use crate::api::{bounded_text, ErrorResponse, MAX_TITLE_LENGTH, MAX_URL_LENGTH};
use crate::auth::AdminUser;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::files::{delete_owned_files, EntityKind, FileOwner};
use crate::models::{Banner, NewBanner};
use crate::schema::banner;
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

use super::hero::promote_to_hero;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateBannerRequest {
    pub title: String,
    pub image_url: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Replaces the current hero when true
    #[serde(default)]
    pub is_hero: bool,
}

impl CreateBannerRequest {
    /// Trimmed title and image URL.
    fn validated(&self) -> Result<(&str, &str), ApiError> {
        Ok((
            bounded_text(&self.title, "Title", MAX_TITLE_LENGTH)?,
            bounded_text(&self.image_url, "Image URL", MAX_URL_LENGTH)?,
        ))
    }
}

/// Trimmed, lowercased, blank-free and deduplicated in first-seen order.
pub fn normalize_keywords(keywords: &[String]) -> Vec<Option<String>> {
    let mut normalized: Vec<Option<String>> = Vec::new();
    for keyword in keywords {
        let keyword = keyword.trim().to_lowercase();
        if keyword.is_empty() {
            continue;
        }
        let keyword = Some(keyword);
        if !normalized.contains(&keyword) {
            normalized.push(keyword);
        }
    }
    normalized
}

#[utoipa::path(
    post,
    path = "/api/banners",
    tag = "banners",
    request_body(content = CreateBannerRequest, example = json!({"title": "Summer grilling", "image_url": "/api/files/12", "keywords": ["bbq", "summer"], "is_hero": false})),
    responses(
        (status = 201, description = "Banner created", body = BannerResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "Admin access required", body = ErrorResponse)
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn create_banner(
    AdminUser(admin): AdminUser,
    State(pool): State<Arc<DbPool>>,
    Json(req): Json<CreateBannerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (title, image_url) = req.validated()?;
    let keywords = normalize_keywords(&req.keywords);

    let mut conn = pool.get()?;

    let created = conn.transaction::<_, ApiError, _>(|conn| {
        let created: Banner = diesel::insert_into(banner::table)
            .values(NewBanner {
                title,
                image_url,
                keywords: &keywords,
                is_hero: false,
            })
            .returning(Banner::as_returning())
            .get_result(conn)?;

        if req.is_hero {
            promote_to_hero(conn, created.banner_id)
        } else {
            Ok(created)
        }
    })?;

    tracing::info!(
        admin_id = admin.id,
        banner_id = created.banner_id,
        "Banner created"
    );

    Ok((StatusCode::CREATED, Json(BannerResponse::from(created))))
}

#[utoipa::path(
    delete,
    path = "/api/banners/{id}",
    tag = "banners",
    params(
        ("id" = i32, Path, description = "Banner ID")
    ),
    responses(
        (status = 204, description = "Banner deleted"),
        (status = 403, description = "Admin access required", body = ErrorResponse),
        (status = 404, description = "Banner not found", body = ErrorResponse)
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn delete_banner(
    AdminUser(admin): AdminUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    conn.transaction::<_, ApiError, _>(|conn| {
        let removed = diesel::delete(banner::table.find(id)).execute(conn)?;
        if removed == 0 {
            return Err(ApiError::NotFound("Banner"));
        }
        delete_owned_files(conn, FileOwner::new(EntityKind::Banner, id))?;
        Ok(())
    })?;

    tracing::info!(admin_id = admin.id, banner_id = id, "Banner deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_keywords() {
        let input = vec![
            " BBQ ".to_string(),
            "".to_string(),
            "bbq".to_string(),
            "Summer".to_string(),
        ];
        assert_eq!(
            normalize_keywords(&input),
            vec![Some("bbq".to_string()), Some("summer".to_string())]
        );
    }

    fn request(title: String, image_url: &str) -> CreateBannerRequest {
        CreateBannerRequest {
            title,
            image_url: image_url.to_string(),
            keywords: Vec::new(),
            is_hero: false,
        }
    }

    #[test]
    fn test_banner_title_length() {
        let req = request(" Summer grilling ".to_string(), "/api/files/12");
        assert_eq!(req.validated().unwrap(), ("Summer grilling", "/api/files/12"));

        let req = request("t".repeat(MAX_TITLE_LENGTH + 1), "/api/files/12");
        let err = req.validated().unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Title must be at most 200 characters");
    }
}
