//! Admin service - orchestrates login and API-key management.
//!
//! This service handles:
//! - Idempotent bootstrap of the administrator account
//! - Credential verification and token issuance
//! - The bearer-token guard (`authorize`) that protected operations require
//! - Listing and creating API keys on behalf of an authorized caller
//!
//! # Authorization
//!
//! `list_keys` and `create_key` take an `AuthContext`, which only `authorize`
//! can produce from a verified token. An unverified caller cannot reach them.

use chrono::Duration;

use crate::{
    db::DbPool,
    error::AppError,
    middleware::auth::AuthContext,
    models::{api_key::ApiKey, token::TokenResponse, user::User},
    services::{credential_store, password, token_service::TokenService},
};

/// Ensure the administrator account exists.
///
/// Safe to run on every startup: an existing user is returned untouched, its
/// password is not reset.
///
/// # Errors
///
/// - `Database`: Store unreachable
/// - `Internal`: Password hashing failed
pub async fn bootstrap(pool: &DbPool, username: &str, password: &str) -> Result<User, AppError> {
    if let Some(existing) = credential_store::find_user_by_username(pool, username).await? {
        tracing::debug!(username, "Admin user already present");
        return Ok(existing);
    }

    let user = credential_store::create_user(pool, username, password).await?;
    tracing::info!(username, id = user.id, "Created admin user");

    Ok(user)
}

/// Verify credentials and issue a bearer token for the user.
///
/// # Process
///
/// 1. Look up the user by name
/// 2. Verify the password against the stored Argon2 digest
/// 3. Issue a token with `sub = username` valid for `ttl`
///
/// # Errors
///
/// - `InvalidCredentials`: Unknown user or wrong password (never distinguished)
/// - `Database`: Store unreachable
/// - `Internal`: Password check task failed or token signing failed
pub async fn login(
    pool: &DbPool,
    tokens: &TokenService,
    username: &str,
    password: &str,
    ttl: Duration,
) -> Result<TokenResponse, AppError> {
    let user = credential_store::find_user_by_username(pool, username).await?;

    let verified = match &user {
        Some(user) => {
            let plain = password.to_string();
            let digest = user.password_hash.clone();
            password::spawn_password_task(move || password::verify_password(&plain, &digest))
                .await?
        }
        None => false,
    };

    let user = match user {
        Some(user) if verified => user,
        _ => {
            tracing::warn!(username, "Rejected login attempt");
            return Err(AppError::InvalidCredentials);
        }
    };

    let access_token = tokens.issue(&user.username, ttl)?;
    tracing::info!(username = %user.username, "Issued access token");

    Ok(TokenResponse::bearer(access_token))
}

/// Verify a bearer token and produce the caller's authorization context.
///
/// The subject is not re-checked against the users table: tokens cannot be
/// revoked, so a validly signed unexpired token is sufficient.
///
/// # Errors
///
/// - `Unauthorized`: Token is malformed, forged, missing its subject or expired
pub fn authorize(tokens: &TokenService, bearer: &str) -> Result<AuthContext, AppError> {
    let subject = tokens.verify(bearer)?;
    Ok(AuthContext::new(subject))
}

/// List all API keys.
pub async fn list_keys(pool: &DbPool, _auth: &AuthContext) -> Result<Vec<ApiKey>, AppError> {
    credential_store::list_api_keys(pool).await
}

/// Create a new API key named `name`.
pub async fn create_key(pool: &DbPool, auth: &AuthContext, name: &str) -> Result<ApiKey, AppError> {
    let api_key = credential_store::create_api_key(pool, name).await?;
    tracing::info!(
        id = api_key.id,
        name = %api_key.name,
        created_by = %auth.subject(),
        "Created API key"
    );

    Ok(api_key)
}
