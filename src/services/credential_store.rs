//! Credential store - persistence for the admin user and API keys.
//!
//! Plain data access over the SQLite pool. Each create is a single
//! `INSERT ... RETURNING` statement, so a record either exists completely or
//! not at all. Uniqueness of `users.username` and `api_keys.key` is enforced
//! by the schema.

use chrono::Utc;
use sha2::{Digest, Sha256};

use crate::{
    db::DbPool,
    error::AppError,
    models::{api_key::ApiKey, user::User},
    services::password,
};

/// Look up a user by username.
///
/// # Returns
///
/// `Ok(None)` when no user with that name exists.
pub async fn find_user_by_username(
    pool: &DbPool,
    username: &str,
) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, password_hash, created_at FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Create a user, hashing the plaintext password before it is stored.
///
/// # Errors
///
/// - `Internal`: Password hashing failed
/// - `Database`: Username already taken or the store is unreachable
pub async fn create_user(pool: &DbPool, username: &str, password: &str) -> Result<User, AppError> {
    let plain = password.to_string();
    let password_hash =
        password::spawn_password_task(move || password::hash_password(&plain)).await??;

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, password_hash, created_at)
        VALUES (?, ?, ?)
        RETURNING id, username, password_hash, created_at
        "#,
    )
    .bind(username)
    .bind(password_hash)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(user)
}

#[cfg(test)]
pub(crate) async fn count_users(pool: &DbPool) -> Result<i64, AppError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// List every API key in creation order.
pub async fn list_api_keys(pool: &DbPool) -> Result<Vec<ApiKey>, AppError> {
    let keys = sqlx::query_as::<_, ApiKey>(
        "SELECT id, name, key, created_at FROM api_keys ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(keys)
}

/// Create an API key under `name` with a freshly generated value.
///
/// # Errors
///
/// - `Database`: Insert failed (including the practically impossible key collision)
pub async fn create_api_key(pool: &DbPool, name: &str) -> Result<ApiKey, AppError> {
    let api_key = sqlx::query_as::<_, ApiKey>(
        r#"
        INSERT INTO api_keys (name, key, created_at)
        VALUES (?, ?, ?)
        RETURNING id, name, key, created_at
        "#,
    )
    .bind(name)
    .bind(generate_api_key())
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(api_key)
}

/// Generate a new API key value.
///
/// # Format
///
/// SHA-256 of 32 random bytes, hex encoded: 64 lowercase hex characters.
pub fn generate_api_key() -> String {
    let bytes: [u8; 32] = rand::random();

    let mut hasher = Sha256::new();
    hasher.update(bytes);

    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::db::test_pool;

    fn is_hex_key(key: &str) -> bool {
        key.len() == 64 && key.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f'))
    }

    #[test]
    fn generated_keys_are_64_hex_chars_and_distinct() {
        let keys: HashSet<String> = (0..100).map(|_| generate_api_key()).collect();

        assert_eq!(keys.len(), 100);
        assert!(keys.iter().all(|k| is_hex_key(k)));
    }

    #[tokio::test]
    async fn created_user_is_found_with_hashed_password() {
        let pool = test_pool().await;

        let created = create_user(&pool, "admin", "adminpass").await.unwrap();
        assert_ne!(created.password_hash, "adminpass");

        let found = find_user_by_username(&pool, "admin")
            .await
            .unwrap()
            .expect("user should exist");
        assert_eq!(found.id, created.id);
        assert!(password::verify_password("adminpass", &found.password_hash));
        assert!(!password::verify_password("wrong", &found.password_hash));
    }

    #[tokio::test]
    async fn unknown_user_is_none() {
        let pool = test_pool().await;

        assert!(find_user_by_username(&pool, "nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_username_is_a_store_error() {
        let pool = test_pool().await;

        create_user(&pool, "admin", "adminpass").await.unwrap();
        let duplicate = create_user(&pool, "admin", "other").await;

        assert!(matches!(duplicate, Err(AppError::Database(_))));
        assert_eq!(count_users(&pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn api_keys_are_listed_in_creation_order() {
        let pool = test_pool().await;

        let first = create_api_key(&pool, "sensor-1").await.unwrap();
        let second = create_api_key(&pool, "sensor-1").await.unwrap();

        assert_ne!(first.key, second.key);
        assert!(is_hex_key(&first.key));

        let keys = list_api_keys(&pool).await.unwrap();
        let ids: Vec<i64> = keys.iter().map(|k| k.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
        assert!(keys.iter().all(|k| k.name == "sensor-1"));
    }
}
