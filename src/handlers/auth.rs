//! Token endpoint.

use axum::{Form, Json, extract::State};

use crate::{
    error::AppError,
    models::token::{LoginForm, TokenResponse},
    services::admin_service,
    state::AppState,
};

/// Exchange admin credentials for a bearer token.
///
/// # Endpoint
///
/// `POST /admin/token`
///
/// # Request Body
///
/// Form-encoded (`application/x-www-form-urlencoded`):
///
/// ```text
/// username=admin&password=adminpass
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: `{"access_token": "...", "token_type": "bearer"}`
/// - **Error (401)**: Incorrect username or password, with `WWW-Authenticate: Bearer`
/// - **Error (4xx)**: Missing form field
pub async fn login_for_access_token(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponse>, AppError> {
    let token = admin_service::login(
        &state.pool,
        &state.tokens,
        &form.username,
        &form.password,
        state.config.access_token_ttl(),
    )
    .await?;

    Ok(Json(token))
}
