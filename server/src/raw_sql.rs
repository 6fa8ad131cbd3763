//! Raw SQL fragments that can't be expressed in Diesel's type-safe DSL.
//!
//! # Safety
//!
//! All SQL in this module has been reviewed for SQL injection safety:
//! - User input is ALWAYS passed via `.bind()` parameters
//! - No string concatenation or interpolation with user data
//!
//! When adding new SQL here:
//! 1. Document why Diesel DSL can't be used
//! 2. Ensure all user input uses `.bind()`

use diesel::sql_types::BigInt;
use diesel::QueryableByName;

/// Filter expression for case-insensitive email comparison against `users.email`.
///
/// # Safety
/// The email value is passed via `.bind()`, not interpolated.
///
/// # Why raw SQL?
/// Diesel has no `LOWER()` on both sides of a comparison; this matches the
/// `LOWER(email)` unique index so the lookup can use it.
#[macro_export]
macro_rules! email_matches {
    ($email:expr) => {
        diesel::dsl::sql::<diesel::sql_types::Bool>("LOWER(users.email) = LOWER(")
            .bind::<diesel::sql_types::Text, _>($email)
            .sql(")")
    };
}

/// Filter expression for case-insensitive ingredient name comparison.
///
/// # Safety
/// The name is passed via `.bind()`, not interpolated.
///
/// # Why raw SQL?
/// Same as [`email_matches!`]: it has to match the `LOWER(name)` unique index.
#[macro_export]
macro_rules! ingredient_name_matches {
    ($name:expr) => {
        diesel::dsl::sql::<diesel::sql_types::Bool>("LOWER(ingredient.name) = LOWER(")
            .bind::<diesel::sql_types::Text, _>($name)
            .sql(")")
    };
}

/// Follower, following and recipe counts for one user in a single round trip.
///
/// # Safety
/// The user id MUST be passed via `.bind::<Integer, _>()` as `$1`.
///
/// # Why raw SQL?
/// Three independent scalar subqueries; the DSL would need three queries.
pub const PROFILE_COUNTS_QUERY: &str = "SELECT \
    (SELECT COUNT(*) FROM followers WHERE user_id = $1) AS follower_count, \
    (SELECT COUNT(*) FROM followers WHERE follower_user_id = $1) AS following_count, \
    (SELECT COUNT(*) FROM recipe WHERE user_id = $1) AS recipe_count";

#[derive(QueryableByName, Debug, Default, PartialEq)]
pub struct ProfileCounts {
    #[diesel(sql_type = BigInt)]
    pub follower_count: i64,
    #[diesel(sql_type = BigInt)]
    pub following_count: i64,
    #[diesel(sql_type = BigInt)]
    pub recipe_count: i64,
}
