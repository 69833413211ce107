//! Liveness probe that also checks the credential store.

use crate::{error::AppError, state::AppState};
use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,

    /// `"connected"` once the store answered a query
    pub database: String,

    pub timestamp: DateTime<Utc>,
}

/// `GET /health`
///
/// Runs `SELECT 1` against the pool. An unreachable store surfaces as the
/// standard 500 error body.
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    sqlx::query("SELECT 1").execute(&state.pool).await?;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        database: "connected".to_string(),
        timestamp: Utc::now(),
    }))
}
