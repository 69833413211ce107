use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: String,
}

/// `GET /` - liveness banner, no authentication.
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "NMSSentinel API is running".to_string(),
    })
}
