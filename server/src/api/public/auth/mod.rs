pub mod forgot_password;
pub mod login;
pub mod logout;
pub mod reset_password;
pub mod signup;

use crate::api::users::UserResponse;
use crate::api::MAX_EMAIL_LENGTH;
use crate::error::ApiError;
use crate::models::User;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Envelope returned by login, signup and logout. The session token itself
/// only travels in the `token` cookie.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserResponse>,
}

impl AuthResponse {
    pub fn message(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            user: None,
        }
    }

    pub fn with_user(message: &str, user: &User) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            user: Some(UserResponse::from(user)),
        }
    }
}

pub fn validate_email(email: &str) -> Result<&str, ApiError> {
    let email = email.trim();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    };

    let too_long = email.chars().count() > MAX_EMAIL_LENGTH;
    if !valid || too_long || email.chars().any(char::is_whitespace) {
        return Err(ApiError::BadRequest("Invalid email address".to_string()));
    }
    Ok(email)
}

pub fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert_eq!(validate_email(" a@b.com ").unwrap(), "a@b.com");
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@b.com").is_err());
        assert!(validate_email("a@localhost").is_err());
        assert!(validate_email("a b@c.com").is_err());

        let long_local = "a".repeat(MAX_EMAIL_LENGTH);
        assert!(validate_email(&format!("{}@b.com", long_local)).is_err());
    }

    #[test]
    fn test_validate_password_length() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("longenough").is_ok());
    }

    #[test]
    fn test_envelope_omits_missing_user() {
        let json = serde_json::to_value(AuthResponse::message("Logged out successfully")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": true, "message": "Logged out successfully"})
        );
    }
}
