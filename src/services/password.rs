//! Password hashing with Argon2.
//!
//! Digests are PHC strings (`$argon2id$v=19$...`) with a random salt embedded,
//! so hashing the same password twice yields two different digests.
//!
//! Both operations are CPU-bound. Async callers run them through
//! [`spawn_password_task`] so they never stall a runtime worker.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::error::AppError;

/// Hash a plaintext password with a fresh random salt.
///
/// # Errors
///
/// Returns `AppError::Internal` if Argon2 rejects its input.
pub fn hash_password(plain: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("argon2 hash: {e}")))
}

/// Check a plaintext password against a stored digest.
///
/// A malformed digest never matches.
pub fn verify_password(plain: &str, digest: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(digest) else {
        return false;
    };

    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok()
}

/// Run a hashing or verification closure on tokio's blocking pool.
///
/// # Errors
///
/// Returns `AppError::Internal` if the task panicked or was cancelled.
pub async fn spawn_password_task<T, F>(work: F) -> Result<T, AppError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::Internal(format!("password task failed: {e}")))
}
