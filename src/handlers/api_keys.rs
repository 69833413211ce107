//! API key management HTTP handlers.
//!
//! This module implements the admin-only endpoints:
//! - GET /admin/apikeys - List all API keys
//! - POST /admin/apikeys - Create a new API key
//!
//! Both sit behind `auth_middleware`, which supplies the `AuthContext`.

use axum::{Extension, Json, extract::State};

use crate::{
    error::AppError,
    middleware::auth::AuthContext,
    models::api_key::{ApiKey, CreateApiKeyRequest},
    services::admin_service,
    state::AppState,
};

/// List every API key.
///
/// # Response
///
/// - **Success (200 OK)**: Array of keys (may be empty), oldest first
/// - **Error (401)**: Missing, invalid or expired bearer token
///
/// ```json
/// [
///   {
///     "id": 1,
///     "name": "sensor-1",
///     "key": "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08",
///     "created_at": "2025-12-20T10:00:00Z"
///   }
/// ]
/// ```
pub async fn list_api_keys(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<ApiKey>>, AppError> {
    let keys = admin_service::list_keys(&state.pool, &auth).await?;

    Ok(Json(keys))
}

/// Create a new API key.
///
/// # Request Body
///
/// ```json
/// { "name": "sensor-1" }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: The created key, including its generated value
/// - **Error (401)**: Missing, invalid or expired bearer token
/// - **Error (4xx)**: Body is not JSON or lacks `name`
pub async fn create_api_key(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<CreateApiKeyRequest>,
) -> Result<Json<ApiKey>, AppError> {
    let api_key = admin_service::create_key(&state.pool, &auth, &request.name).await?;

    Ok(Json(api_key))
}
