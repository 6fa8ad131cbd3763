#![allow(dead_code)]

use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};
use recipebox_server::config::Config;
use recipebox_server::db::run_migrations;
use recipebox_server::models::{NewRecipe, NewUser, Recipe, Role, User};
use recipebox_server::schema::{recipe, users};
use recipebox_server::AppState;
use std::env;
use std::sync::{Mutex, MutexGuard};

pub const TEST_SECRET: &str = "integration-test-secret";

/// App state whose pool never connects until a handler asks for a connection.
/// Enough for routes that reject or answer before touching the database.
pub fn offline_state() -> AppState {
    let manager = ConnectionManager::<PgConnection>::new("postgres://unused@127.0.0.1:1/unused");
    let pool = r2d2::Pool::builder()
        .max_size(1)
        .connection_timeout(std::time::Duration::from_millis(200))
        .build_unchecked(manager);

    AppState::new(
        pool,
        Config {
            database_url: String::new(),
            bind_addr: "127.0.0.1:0".to_string(),
            jwt_secret: Some(TEST_SECRET.to_string()),
            public_url: "http://localhost:3000".to_string(),
        },
    )
}

static DB_LOCK: Mutex<()> = Mutex::new(());

/// Database tests share one schema; hold this for the whole test.
pub fn db_lock() -> MutexGuard<'static, ()> {
    DB_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

/// Migrated connection to TEST_DATABASE_URL.
pub fn test_connection() -> PgConnection {
    let url = env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL must be set");
    let mut conn = PgConnection::establish(&url).expect("connect to test database");
    run_migrations(&mut conn).expect("run migrations");
    conn
}

pub fn insert_user(conn: &mut PgConnection, name: &str, email: &str) -> User {
    diesel::insert_into(users::table)
        .values(NewUser {
            name,
            email,
            password_hash: "not-a-real-hash",
            role: Role::User.as_str(),
        })
        .returning(User::as_returning())
        .get_result(conn)
        .expect("insert user")
}

pub fn insert_recipe(conn: &mut PgConnection, user_id: i32, title: &str) -> Recipe {
    diesel::insert_into(recipe::table)
        .values(NewRecipe {
            user_id,
            category_id: None,
            sub_category_id: None,
            title,
            description: None,
            prep_time_minutes: None,
            cook_time_minutes: None,
            servings: None,
        })
        .returning(Recipe::as_returning())
        .get_result(conn)
        .expect("insert recipe")
}
