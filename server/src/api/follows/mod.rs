pub mod follow;
pub mod list;

use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for follower endpoints
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/users/{id}/follow",
            post(follow::follow_user).delete(follow::unfollow_user),
        )
        .route("/api/users/{id}/followers", get(list::list_followers))
        .route("/api/users/{id}/following", get(list::list_following))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        follow::follow_user,
        follow::unfollow_user,
        list::list_followers,
        list::list_following,
    ),
    components(schemas(follow::FollowResponse, list::FollowListResponse, list::UserSummary))
)]
pub struct ApiDoc;
