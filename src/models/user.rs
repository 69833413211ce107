//! User model for the administrator account.

use chrono::{DateTime, Utc};

/// Represents a user record from the database.
///
/// # Database Table
///
/// Maps to the `users` table with columns:
/// - `id`: Auto-incremented identifier
/// - `username`: Unique login name
/// - `password_hash`: Argon2 PHC string (salt embedded)
/// - `created_at`: When the user was created
///
/// Deliberately not `Serialize`: the hash must never reach a response body.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,

    pub username: String,

    pub password_hash: String,

    pub created_at: DateTime<Utc>,
}
