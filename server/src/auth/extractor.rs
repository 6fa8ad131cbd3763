use crate::config::Config;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::User;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use axum_extra::extract::CookieJar;
use std::sync::Arc;

use super::db::find_user_by_id;
use super::session::{decode_token, SESSION_COOKIE};

/// Extractor that validates the session cookie and provides the authenticated user.
///
/// The `token` cookie is checked first; an `Authorization: Bearer` header is
/// accepted as a fallback for non-browser clients.
/// ```ignore
/// async fn my_handler(AuthUser(user): AuthUser) -> impl IntoResponse {
///     // user is the authenticated User
/// }
/// ```
pub struct AuthUser(pub User);

/// An [`AuthUser`] whose role is `admin`. Rejects everyone else with 403.
pub struct AdminUser(pub User);

fn token_from_parts(parts: &Parts) -> Option<String> {
    let jar = CookieJar::from_headers(&parts.headers);
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }

    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::to_string)
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<DbPool>: FromRef<S>,
    Arc<Config>: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = token_from_parts(parts).ok_or(ApiError::Unauthorized)?;

        // Without a secret no token could have been issued
        let config = Arc::<Config>::from_ref(state);
        let secret = config.jwt_secret.as_deref().ok_or(ApiError::Unauthorized)?;

        let claims = decode_token(&token, secret).map_err(|_| ApiError::Unauthorized)?;
        let user_id = claims.user_id().ok_or(ApiError::Unauthorized)?;

        let pool = Arc::<DbPool>::from_ref(state);
        let mut conn = pool.get()?;

        // Deleted accounts keep valid-looking tokens until expiry
        let user = find_user_by_id(&mut conn, user_id)?.ok_or(ApiError::Unauthorized)?;

        Ok(AuthUser(user))
    }
}

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    Arc<DbPool>: FromRef<S>,
    Arc<Config>: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;

        if !user.is_admin() {
            return Err(ApiError::Forbidden("Admin access required"));
        }

        Ok(AdminUser(user))
    }
}
