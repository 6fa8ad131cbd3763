mod crypto;
mod db;
mod extractor;
mod session;

pub use crypto::{generate_token, hash_password, hash_token, verify_password};
pub use db::{find_user_by_email, find_user_by_id, find_user_by_reset_token, RESET_TOKEN_TTL_MINUTES};
pub use extractor::{AdminUser, AuthUser};
pub use session::{
    cleared_session_cookie, decode_token, issue_token, session_cookie, Claims, IssuedToken,
    SessionError, SESSION_COOKIE, SESSION_TTL_DAYS,
};
