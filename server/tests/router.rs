mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use common::offline_state;
use http_body_util::BodyExt;
use recipebox_server::api::public::auth::AuthResponse;
use recipebox_server::api::ErrorResponse;
use recipebox_server::app;
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn logout_clears_the_session_cookie() {
    let response = app(offline_state())
        .oneshot(
            Request::post("/api/auth/logout")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("logout sets a cookie")
        .to_str()
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with("token=;"), "{}", set_cookie);
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Strict"));
    assert!(set_cookie.contains("Expires=Thu, 01 Jan 1970 00:00:00 GMT"));

    let body: AuthResponse = body_json(response).await;
    assert!(body.success);
    assert!(body.user.is_none());
}

#[tokio::test]
async fn protected_route_without_cookie_is_unauthorized() {
    let response = app(offline_state())
        .oneshot(Request::get("/api/users/me").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: ErrorResponse = body_json(response).await;
    assert_eq!(body.error, "Not authenticated");
}

#[tokio::test]
async fn forged_token_is_unauthorized() {
    // Signed with a different secret than the server's
    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &serde_json::json!({"sub": "1", "email": "a@b.com", "role": "admin", "iat": 0, "exp": 4_102_444_800u64}),
        &jsonwebtoken::EncodingKey::from_secret(b"not-the-server-secret"),
    )
    .unwrap();

    let response = app(offline_state())
        .oneshot(
            Request::post("/api/categories")
                .header(header::COOKIE, format!("token={}", token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"name": "Desserts"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn bearer_header_is_checked_too() {
    let response = app(offline_state())
        .oneshot(
            Request::delete("/api/recipes/1")
                .header(header::AUTHORIZATION, "Bearer garbage")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let response = app(offline_state())
        .oneshot(
            Request::get("/api-docs/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let spec: serde_json::Value = body_json(response).await;
    assert!(spec["paths"]["/api/banners/{id}/hero"]["put"].is_object());
    assert!(spec["components"]["securitySchemes"]["cookie_auth"].is_object());
}

#[tokio::test]
async fn over_long_signup_name_is_a_bad_request() {
    let body = serde_json::json!({
        "name": "a".repeat(101),
        "email": "long@example.com",
        "password": "longenough",
    });

    let response = app(offline_state())
        .oneshot(
            Request::post("/api/auth/signup")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = body_json(response).await;
    assert_eq!(body.error, "Name must be at most 100 characters");
}
