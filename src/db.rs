//! Database connection pool and schema management.
//!
//! This module provides utilities for:
//! - Creating and managing a SQLite connection pool
//! - Applying the `users` / `api_keys` schema at startup

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};

/// Type alias for the SQLite connection pool.
///
/// Instead of writing `Pool<Sqlite>` everywhere, we can use `DbPool`.
pub type DbPool = Pool<Sqlite>;

/// Create a new SQLite connection pool.
///
/// File databases are created on first use. An in-memory database
/// (`sqlite::memory:`) only exists for as long as its connection, so it gets a
/// single connection that is never closed for idleness or age.
///
/// # Arguments
///
/// * `database_url` - SQLite connection string
///
/// # Errors
///
/// Returns an error if:
/// - Database connection string is invalid
/// - The database file cannot be opened or created
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    if database_url.contains(":memory:") {
        return SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await;
    }

    SqlitePoolOptions::new()
        // Limit concurrent connections
        .max_connections(5)
        .connect_with(options)
        .await
}

/// Apply the schema from the `migrations/` directory.
///
/// Applied scripts are tracked in `_sqlx_migrations`, so running this on every
/// startup is a no-op once the tables exist.
///
/// # Errors
///
/// Returns an error if a script fails to execute against the database.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    // The macro reads migrations at compile time from ./migrations directory
    sqlx::migrate!("./migrations").run(pool).await
}

/// In-memory pool with the schema applied, shared by unit tests.
#[cfg(test)]
pub(crate) async fn test_pool() -> DbPool {
    let pool = create_pool("sqlite::memory:").await.unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}
