//! # SchoolHub DB
//!
//! PostgreSQL pool setup, embedded migrations, and helpers for classifying
//! storage errors.
//!
//! ```ignore
//! let pool = schoolhub_db::init_db_pool().await?;
//! schoolhub_db::run_migrations(&pool).await?;
//! ```

use std::env;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

pub use sqlx::PgPool;

/// Connects to the database named by `DATABASE_URL`.
///
/// `DB_MAX_CONNECTIONS` caps the pool size (default 10).
pub async fn init_db_pool() -> Result<PgPool, sqlx::Error> {
    let database_url = env::var("DATABASE_URL")
        .map_err(|_| sqlx::Error::Configuration("DATABASE_URL must be set".into()))?;

    let max_connections = env::var("DB_MAX_CONNECTIONS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(10);

    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&database_url)
        .await
}

/// Applies the migrations bundled from the workspace `migrations/` directory.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}

/// Name of the violated constraint when `err` is a unique violation.
///
/// Returns `Some("")` when the driver did not report a constraint name.
pub fn unique_violation(err: &sqlx::Error) -> Option<&str> {
    match err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            Some(db_err.constraint().unwrap_or(""))
        }
        _ => None,
    }
}

pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_are_not_violations() {
        let err = sqlx::Error::RowNotFound;
        assert!(unique_violation(&err).is_none());
        assert!(!is_foreign_key_violation(&err));
    }
}
