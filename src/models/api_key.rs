//! API Key model.
//!
//! API keys are opaque credentials handed out by the administrator. The value
//! is generated server-side (see `credential_store::generate_api_key`) and is
//! never derived from the caller-supplied name.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Represents an API key record from the database.
///
/// # Database Table
///
/// Maps to the `api_keys` table with columns:
/// - `id`: Auto-incremented identifier
/// - `name`: Caller-supplied label (not unique)
/// - `key`: Unique 64-character hex value
/// - `created_at`: When the key was created
///
/// # JSON Example
///
/// ```json
/// {
///   "id": 1,
///   "name": "sensor-1",
///   "key": "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08",
///   "created_at": "2025-12-20T10:00:00Z"
/// }
/// ```
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct ApiKey {
    /// Unique identifier for this API key
    pub id: i64,

    /// Human-readable label chosen by the administrator
    pub name: String,

    /// The key itself (64 hex characters); immutable after creation
    pub key: String,

    /// Timestamp when this API key was created
    pub created_at: DateTime<Utc>,
}

/// Request body for creating a new API key.
///
/// ```json
/// { "name": "sensor-1" }
/// ```
#[derive(Debug, Deserialize)]
pub struct CreateApiKeyRequest {
    pub name: String,
}
