//! Session tokens carried in the `token` cookie.
//!
//! A session is an HS256 JWT asserting the user's id, email and role. It is
//! valid for exactly [`SESSION_TTL_DAYS`] from issuance and is never
//! refreshed. Logging out only overwrites the cookie; there is no server-side
//! revocation, so a copied token stays valid until it expires.

use crate::models::{Role, User};
use axum_extra::extract::cookie::{Cookie, SameSite};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{Duration, OffsetDateTime};

pub const SESSION_COOKIE: &str = "token";
pub const SESSION_TTL_DAYS: i64 = 30;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("JWT_SECRET is not configured")]
    MissingSecret,

    #[error("Failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    #[error("Invalid or expired token")]
    InvalidToken,
}

impl SessionError {
    /// True when the error is the client's fault (bad or expired token)
    /// rather than a server misconfiguration.
    pub fn is_rejection(&self) -> bool {
        matches!(self, SessionError::InvalidToken)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// User id, as a string per JWT convention
    pub sub: String,
    pub email: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn user_id(&self) -> Option<i32> {
        self.sub.parse().ok()
    }
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: OffsetDateTime,
}

pub fn issue_token(
    user: &User,
    secret: Option<&str>,
    now: OffsetDateTime,
) -> Result<IssuedToken, SessionError> {
    let secret = secret.ok_or(SessionError::MissingSecret)?;
    let expires_at = now + Duration::days(SESSION_TTL_DAYS);

    let claims = Claims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        role: user.role(),
        iat: now.unix_timestamp(),
        exp: expires_at.unix_timestamp(),
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(SessionError::Signing)?;

    Ok(IssuedToken { token, expires_at })
}

pub fn decode_token(token: &str, secret: &str) -> Result<Claims, SessionError> {
    let validation = Validation::new(Algorithm::HS256);
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| SessionError::InvalidToken)
}

fn base_cookie(value: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(true)
        .path("/")
        .build()
}

/// Cookie carrying a freshly issued session token.
pub fn session_cookie(issued: IssuedToken) -> Cookie<'static> {
    let mut cookie = base_cookie(issued.token);
    cookie.set_expires(issued.expires_at);
    cookie
}

/// Cookie that overwrites the session with an empty value expiring at the
/// Unix epoch, so the browser drops it.
pub fn cleared_session_cookie() -> Cookie<'static> {
    let mut cookie = base_cookie(String::new());
    cookie.set_expires(OffsetDateTime::UNIX_EPOCH);
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    const SECRET: &str = "test-secret";

    fn user(id: i32, email: &str, role: &str) -> User {
        User {
            id,
            name: "Test".to_string(),
            email: email.to_string(),
            password_hash: String::new(),
            role: role.to_string(),
            reset_password_token_hash: None,
            reset_password_expires_at: None,
            profile_picture_file_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_token_carries_identity_and_role() {
        let issued = issue_token(
            &user(1, "a@b.com", "user"),
            Some(SECRET),
            OffsetDateTime::now_utc(),
        )
        .unwrap();

        let claims = decode_token(&issued.token, SECRET).unwrap();
        assert_eq!(claims.sub, "1");
        assert_eq!(claims.user_id(), Some(1));
        assert_eq!(claims.email, "a@b.com");
        assert_eq!(claims.role, Role::User);
    }

    #[test]
    fn test_token_lifetime_is_exactly_thirty_days() {
        let now = OffsetDateTime::now_utc();
        let issued = issue_token(&user(7, "x@y.z", "admin"), Some(SECRET), now).unwrap();
        let claims = decode_token(&issued.token, SECRET).unwrap();

        assert_eq!(claims.exp - claims.iat, 30 * 24 * 60 * 60);
        assert_eq!(issued.expires_at, now + Duration::days(30));
        assert_eq!(claims.role, Role::Admin);
    }

    #[test]
    fn test_missing_secret_aborts_issuance() {
        let result = issue_token(&user(1, "a@b.com", "user"), None, OffsetDateTime::now_utc());
        assert!(matches!(result, Err(SessionError::MissingSecret)));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let issued = issue_token(
            &user(1, "a@b.com", "user"),
            Some(SECRET),
            OffsetDateTime::now_utc(),
        )
        .unwrap();
        let result = decode_token(&issued.token, "other-secret");
        assert!(matches!(result, Err(SessionError::InvalidToken)));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let long_ago = OffsetDateTime::now_utc() - Duration::days(31);
        let issued = issue_token(&user(1, "a@b.com", "user"), Some(SECRET), long_ago).unwrap();
        assert!(decode_token(&issued.token, SECRET).is_err());
    }

    #[test]
    fn test_issue_then_clear_cookie() {
        let now = OffsetDateTime::now_utc();
        let issued = issue_token(&user(1, "a@b.com", "user"), Some(SECRET), now).unwrap();
        let token = issued.token.clone();

        let set = session_cookie(issued);
        assert_eq!(set.name(), "token");
        assert_eq!(set.value(), token);
        assert_eq!(set.http_only(), Some(true));
        assert_eq!(set.secure(), Some(true));
        assert_eq!(set.same_site(), Some(SameSite::Strict));
        let expires = set.expires_datetime().unwrap();
        assert!(expires > now);

        let cleared = cleared_session_cookie();
        assert_eq!(cleared.name(), "token");
        assert_eq!(cleared.value(), "");
        assert_eq!(cleared.expires_datetime(), Some(OffsetDateTime::UNIX_EPOCH));
        assert_eq!(cleared.http_only(), Some(true));
        assert_eq!(cleared.path(), Some("/"));
    }
}
