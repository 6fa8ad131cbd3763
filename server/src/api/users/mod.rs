pub mod delete;
pub mod me;
pub mod profile;
pub mod profile_picture;
pub mod update;

use crate::files::file_url;
use crate::models::{Role, User};
use crate::AppState;
use axum::routing::{get, put};
use axum::Router;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

/// User as returned by the API. Never carries the password or reset hashes.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub profile_picture_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role(),
            profile_picture_url: user.profile_picture_file_id.map(file_url),
            created_at: user.created_at,
        }
    }
}

/// Returns the router for /api/users endpoints
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/users/me",
            get(me::get_me)
                .patch(update::update_me)
                .delete(delete::delete_me),
        )
        .route(
            "/api/users/me/profile-picture",
            put(profile_picture::upload_profile_picture),
        )
        .route("/api/users/{id}", get(profile::get_profile))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        me::get_me,
        update::update_me,
        delete::delete_me,
        profile::get_profile,
        profile_picture::upload_profile_picture,
    ),
    components(schemas(
        UserResponse,
        update::UpdateMeRequest,
        profile::ProfileResponse,
        profile_picture::UploadImageRequest,
    ))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    fn user(profile_picture_file_id: Option<i32>) -> User {
        User {
            id: 7,
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role: "admin".to_string(),
            reset_password_token_hash: Some("deadbeef".to_string()),
            reset_password_expires_at: None,
            profile_picture_file_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_response_hides_secrets() {
        let json = serde_json::to_value(UserResponse::from(&user(None))).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(json.get("reset_password_token_hash").is_none());
        assert_eq!(json["role"], "admin");
        assert!(json["profile_picture_url"].is_null());
    }

    #[test]
    fn test_profile_picture_url() {
        let response = UserResponse::from(&user(Some(12)));
        assert_eq!(
            response.profile_picture_url.as_deref(),
            Some("/api/files/12")
        );
    }
}
