use crate::api::ErrorResponse;
use crate::auth::SessionError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

/// Error type returned by every handler.
///
/// Storage constraint violations are surfaced with a matching status rather
/// than retried: unique violations become 409, foreign key and check
/// violations become 400.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Not authenticated")]
    Unauthorized,

    #[error("Invalid credentials")]
    BadCredentials,

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(DieselError),

    #[error("Database connection failed: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("{0}")]
    Internal(String),
}

impl From<DieselError> for ApiError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => ApiError::NotFound("Resource"),
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info) => {
                ApiError::Conflict(conflict_message(info.constraint_name()))
            }
            // Restricted delete of an ingredient still referenced by a recipe
            DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, ref info)
                if info.constraint_name() == Some("recipe_ingredient_ingredient_id_fkey")
                    && info.message().contains("delete") =>
            {
                ApiError::Conflict("Ingredient is used by at least one recipe".to_string())
            }
            DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, ref info) => {
                ApiError::BadRequest(format!(
                    "Referenced row does not exist or is still in use{}",
                    info.constraint_name()
                        .map(|c| format!(" ({})", c))
                        .unwrap_or_default()
                ))
            }
            DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, _) => {
                ApiError::BadRequest("Value violates a table constraint".to_string())
            }
            other => ApiError::Database(other),
        }
    }
}

fn conflict_message(constraint: Option<&str>) -> String {
    match constraint {
        Some("idx_users_email") => "Email already registered".to_string(),
        Some("idx_banner_single_hero") => "Another banner is already the hero".to_string(),
        Some("likes_user_id_recipe_id_key") => "Recipe already liked".to_string(),
        Some("save_recipe_user_id_recipe_id_key") => "Recipe already saved".to_string(),
        Some("followers_user_id_follower_user_id_key") => "Already following".to_string(),
        Some("recipe_category_name_key") => "Category already exists".to_string(),
        Some("recipe_sub_category_category_id_name_key") => {
            "Sub-category already exists in this category".to_string()
        }
        Some("idx_ingredient_name") => "Ingredient already exists".to_string(),
        Some(name) => format!("Duplicate value violates {}", name),
        None => "Duplicate value".to_string(),
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized | ApiError::BadCredentials => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Session(e) if e.is_rejection() => StatusCode::UNAUTHORIZED,
            ApiError::Database(_)
            | ApiError::Pool(_)
            | ApiError::Session(_)
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Don't leak internals to clients
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("{}", self);
            match self {
                ApiError::Pool(_) => "Database connection failed".to_string(),
                ApiError::Session(_) => "Failed to issue session".to_string(),
                _ => "Internal server error".to_string(),
            }
        } else {
            self.to_string()
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
