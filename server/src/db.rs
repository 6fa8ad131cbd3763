use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use thiserror::Error;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("../migrations");

pub type DbPool = r2d2::Pool<ConnectionManager<PgConnection>>;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Failed to create database pool: {0}")]
    Pool(#[from] r2d2::PoolError),

    #[error("Migration failed: {0}")]
    Migration(String),
}

pub fn create_pool(database_url: &str) -> Result<DbPool, DbError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = r2d2::Pool::builder().build(manager)?;

    // Run pending migrations on startup
    let mut conn = pool.get()?;
    let applied = run_migrations(&mut conn)?;
    if !applied.is_empty() {
        tracing::info!("Applied {} database migration(s)", applied.len());
    }

    Ok(pool)
}

/// Apply every pending migration, returning the versions that ran.
pub fn run_migrations(conn: &mut PgConnection) -> Result<Vec<String>, DbError> {
    let versions = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| DbError::Migration(e.to_string()))?;
    Ok(versions.iter().map(|v| v.to_string()).collect())
}

/// Revert every applied migration, newest first.
pub fn revert_migrations(conn: &mut PgConnection) -> Result<Vec<String>, DbError> {
    let versions = conn
        .revert_all_migrations(MIGRATIONS)
        .map_err(|e| DbError::Migration(e.to_string()))?;
    Ok(versions.iter().map(|v| v.to_string()).collect())
}
