pub mod banners;
pub mod categories;
pub mod comments;
pub mod files;
pub mod follows;
pub mod ingredients;
pub mod likes;
pub mod public;
pub mod recipes;
pub mod saved;
pub mod users;

use crate::AppState;
use axum::Router;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{IntoParams, OpenApi, ToSchema};

/// Shared error response used by all endpoints
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct PageParams {
    /// Number of items to return (default: 20, max: 100)
    pub limit: Option<i64>,
    /// Number of items to skip (default: 0)
    pub offset: Option<i64>,
}

impl PageParams {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

/// Trim `value` and reject it when empty.
pub fn required_text<'a>(value: &'a str, field: &str) -> Result<&'a str, crate::error::ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(crate::error::ApiError::BadRequest(format!(
            "{} cannot be empty",
            field
        )));
    }
    Ok(trimmed)
}

/// Widths of the bounded VARCHAR columns. Postgres rejects longer values
/// with an error diesel can't classify, so handlers check first.
pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_EMAIL_LENGTH: usize = 255;
pub const MAX_TITLE_LENGTH: usize = 200;
pub const MAX_URL_LENGTH: usize = 500;

fn check_length(value: &str, field: &str, max: usize) -> Result<(), crate::error::ApiError> {
    if value.chars().count() > max {
        return Err(crate::error::ApiError::BadRequest(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}

/// `required_text` that also rejects values longer than `max` characters.
pub fn bounded_text<'a>(
    value: &'a str,
    field: &str,
    max: usize,
) -> Result<&'a str, crate::error::ApiError> {
    let trimmed = required_text(value, field)?;
    check_length(trimmed, field, max)?;
    Ok(trimmed)
}

/// `optional_text` that also rejects values longer than `max` characters.
pub fn optional_bounded_text<'a>(
    value: Option<&'a str>,
    field: &str,
    max: usize,
) -> Result<Option<&'a str>, crate::error::ApiError> {
    let value = optional_text(value);
    if let Some(v) = value {
        check_length(v, field, max)?;
    }
    Ok(value)
}

/// Trimmed value, or `None` when absent or blank.
pub fn optional_text(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Deserializer for PATCH-style fields where `null` and absent mean different
/// things. Use with `#[serde(default, deserialize_with = "nullable")]`:
/// absent is `None`, `null` is `Some(None)`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// All API routes. Each module declares full paths so routers merge without nesting.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(public::router())
        .merge(users::router())
        .merge(follows::router())
        .merge(recipes::router())
        .merge(comments::router())
        .merge(likes::router())
        .merge(saved::router())
        .merge(categories::router())
        .merge(ingredients::router())
        .merge(banners::router())
        .merge(files::router())
}

/// Generate the complete OpenAPI spec by merging all module specs
pub fn openapi() -> utoipa::openapi::OpenApi {
    // Base spec with shared components and security
    #[derive(OpenApi)]
    #[openapi(components(schemas(ErrorResponse, crate::models::Role)))]
    struct BaseApi;

    let mut spec = BaseApi::openapi();

    if let Some(components) = spec.components.as_mut() {
        components.add_security_scheme(
            "cookie_auth",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(
                crate::auth::SESSION_COOKIE,
            ))),
        );
    }

    // Merge in each module's spec
    let modules: Vec<utoipa::openapi::OpenApi> = vec![
        public::ApiDoc::openapi(),
        users::ApiDoc::openapi(),
        follows::ApiDoc::openapi(),
        recipes::ApiDoc::openapi(),
        comments::ApiDoc::openapi(),
        likes::ApiDoc::openapi(),
        saved::ApiDoc::openapi(),
        categories::ApiDoc::openapi(),
        ingredients::ApiDoc::openapi(),
        banners::ApiDoc::openapi(),
        files::ApiDoc::openapi(),
    ];

    for module_spec in modules {
        // Merge paths
        spec.paths.paths.extend(module_spec.paths.paths);

        // Merge components (schemas)
        if let Some(module_components) = module_spec.components {
            if let Some(spec_components) = spec.components.as_mut() {
                spec_components.schemas.extend(module_components.schemas);
            }
        }
    }

    spec
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_params_defaults_and_clamping() {
        let params = PageParams::default();
        assert_eq!(params.limit(), DEFAULT_PAGE_SIZE);
        assert_eq!(params.offset(), 0);

        let params = PageParams {
            limit: Some(10_000),
            offset: Some(-5),
        };
        assert_eq!(params.limit(), MAX_PAGE_SIZE);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_required_text_trims() {
        assert_eq!(required_text("  Desserts ", "Name").unwrap(), "Desserts");
        assert!(required_text("   ", "Name").is_err());
    }

    #[test]
    fn test_optional_text_drops_blanks() {
        assert_eq!(optional_text(Some(" 2 cups ")), Some("2 cups"));
        assert_eq!(optional_text(Some("  ")), None);
        assert_eq!(optional_text(None), None);
    }

    #[test]
    fn test_bounded_text_rejects_over_long_values() {
        let at_limit = "a".repeat(MAX_NAME_LENGTH);
        assert_eq!(bounded_text(&at_limit, "Name", MAX_NAME_LENGTH).unwrap(), at_limit);

        let err = bounded_text(&"a".repeat(MAX_NAME_LENGTH + 1), "Name", MAX_NAME_LENGTH).unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Name must be at most 100 characters");

        // Counted in characters, not bytes
        assert!(bounded_text(&"é".repeat(MAX_NAME_LENGTH), "Name", MAX_NAME_LENGTH).is_ok());
        // Surrounding whitespace doesn't count
        assert!(bounded_text(&format!("  {}  ", at_limit), "Name", MAX_NAME_LENGTH).is_ok());
        assert!(bounded_text("   ", "Name", MAX_NAME_LENGTH).is_err());
    }

    #[test]
    fn test_optional_bounded_text() {
        assert_eq!(optional_bounded_text(None, "Image URL", MAX_URL_LENGTH).unwrap(), None);
        assert_eq!(optional_bounded_text(Some(" "), "Image URL", MAX_URL_LENGTH).unwrap(), None);
        let long = "u".repeat(MAX_URL_LENGTH + 1);
        let err = optional_bounded_text(Some(&long), "Image URL", MAX_URL_LENGTH).unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "nullable")]
        servings: Option<Option<i32>>,
    }

    #[test]
    fn test_nullable_distinguishes_null_from_absent() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.servings, None);

        let null: Patch = serde_json::from_str(r#"{"servings": null}"#).unwrap();
        assert_eq!(null.servings, Some(None));

        let set: Patch = serde_json::from_str(r#"{"servings": 4}"#).unwrap();
        assert_eq!(set.servings, Some(Some(4)));
    }

    #[test]
    fn test_openapi_contains_every_module() {
        let spec = openapi();
        for path in [
            "/api/auth/login",
            "/api/auth/logout",
            "/api/users/me",
            "/api/users/{id}/follow",
            "/api/recipes/{id}",
            "/api/recipes/{id}/comments",
            "/api/recipes/{id}/like",
            "/api/recipes/{id}/save",
            "/api/categories",
            "/api/ingredients",
            "/api/banners/{id}/hero",
            "/api/files/{id}",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
