pub mod create;
pub mod delete;
pub mod list;
pub mod update;

use crate::api::follows::list::UserSummary;
use crate::error::ApiError;
use crate::models::{Comment, User};
use crate::schema::comment;
use crate::AppState;
use axum::routing::{get, patch};
use axum::Router;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

/// Longest accepted comment body, in characters.
pub const MAX_COMMENT_LENGTH: usize = 2000;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommentResponse {
    pub comment_id: i32,
    pub recipe_id: i32,
    pub author: UserSummary,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CommentResponse {
    pub fn new(comment: Comment, author: UserSummary) -> Self {
        Self {
            comment_id: comment.comment_id,
            recipe_id: comment.recipe_id,
            author,
            content: comment.content,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CommentRequest {
    pub content: String,
}

impl CommentRequest {
    pub fn validated(&self) -> Result<&str, ApiError> {
        let content = crate::api::required_text(&self.content, "Comment")?;
        if content.chars().count() > MAX_COMMENT_LENGTH {
            return Err(ApiError::BadRequest(format!(
                "Comment must be at most {} characters",
                MAX_COMMENT_LENGTH
            )));
        }
        Ok(content)
    }
}

pub fn find_comment(conn: &mut PgConnection, comment_id: i32) -> Result<Comment, ApiError> {
    comment::table
        .find(comment_id)
        .select(Comment::as_select())
        .first(conn)
        .optional()?
        .ok_or(ApiError::NotFound("Comment"))
}

fn author_summary(user: &User) -> UserSummary {
    UserSummary::new(user.id, user.name.clone(), user.profile_picture_file_id)
}

/// Returns the router for comment endpoints
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/recipes/{id}/comments",
            get(list::list_comments).post(create::create_comment),
        )
        .route(
            "/api/comments/{id}",
            patch(update::update_comment).delete(delete::delete_comment),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list::list_comments,
        create::create_comment,
        update::update_comment,
        delete::delete_comment,
    ),
    components(schemas(CommentResponse, CommentRequest, list::CommentListResponse))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    fn request(content: &str) -> CommentRequest {
        CommentRequest {
            content: content.to_string(),
        }
    }

    #[test]
    fn test_comment_is_trimmed() {
        assert_eq!(request("  Lovely!  ").validated().unwrap(), "Lovely!");
    }

    #[test]
    fn test_blank_and_oversized_comments_rejected() {
        assert!(request("   ").validated().is_err());
        assert!(request(&"a".repeat(MAX_COMMENT_LENGTH + 1)).validated().is_err());
    }
}
