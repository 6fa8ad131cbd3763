use super::AuthResponse;
use crate::auth::cleared_session_cookie;
use axum::{http::StatusCode, response::IntoResponse, Json};
use axum_extra::extract::CookieJar;

/// Overwrites the session cookie with an expired, empty one. The token
/// itself stays valid until its own expiry if it was copied elsewhere.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Session cookie cleared", body = AuthResponse)
    )
)]
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    (
        StatusCode::OK,
        jar.add(cleared_session_cookie()),
        Json(AuthResponse::message("Logged out successfully")),
    )
}
