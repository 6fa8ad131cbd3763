use crate::models::User;
use crate::schema::users;
use chrono::Utc;
use diesel::prelude::*;

use super::crypto::hash_token;

/// How long a password reset link stays usable.
pub const RESET_TOKEN_TTL_MINUTES: i64 = 60;

pub fn find_user_by_id(conn: &mut PgConnection, id: i32) -> QueryResult<Option<User>> {
    users::table
        .find(id)
        .select(User::as_select())
        .first(conn)
        .optional()
}

/// Case-insensitive lookup, matching the `LOWER(email)` unique index.
pub fn find_user_by_email(conn: &mut PgConnection, email: &str) -> QueryResult<Option<User>> {
    users::table
        .filter(crate::email_matches!(email))
        .select(User::as_select())
        .first(conn)
        .optional()
}

/// Find the user holding an unexpired reset token.
pub fn find_user_by_reset_token(conn: &mut PgConnection, token: &str) -> QueryResult<Option<User>> {
    let token_hash = hash_token(token);

    users::table
        .filter(users::reset_password_token_hash.eq(&token_hash))
        .filter(users::reset_password_expires_at.gt(Utc::now()))
        .select(User::as_select())
        .first(conn)
        .optional()
}
