pub mod auth;

use crate::AppState;
use axum::routing::post;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for public endpoints (no auth required)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/auth/signup", post(auth::signup::signup))
        .route("/api/auth/login", post(auth::login::login))
        .route("/api/auth/logout", post(auth::logout::logout))
        .route(
            "/api/auth/forgot-password",
            post(auth::forgot_password::forgot_password),
        )
        .route(
            "/api/auth/reset-password",
            post(auth::reset_password::reset_password),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::signup::signup,
        auth::login::login,
        auth::logout::logout,
        auth::forgot_password::forgot_password,
        auth::reset_password::reset_password,
    ),
    components(schemas(
        auth::AuthResponse,
        auth::signup::SignupRequest,
        auth::login::LoginRequest,
        auth::forgot_password::ForgotPasswordRequest,
        auth::reset_password::ResetPasswordRequest,
    ))
)]
pub struct ApiDoc;
