//! Router assembly.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::{handlers, middleware, state::AppState};

/// Build the HTTP router.
///
/// # Layers
///
/// - `/admin/apikeys` is wrapped by the bearer-token guard
/// - Every route, public or protected, passes the rate limiter first
/// - `TraceLayer` wraps everything
pub fn router(state: AppState) -> Router {
    let authenticated_routes = Router::new()
        .route(
            "/admin/apikeys",
            get(handlers::api_keys::list_api_keys).post(handlers::api_keys::create_api_key),
        )
        // Apply authentication middleware to all routes in this group
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::auth_middleware,
        ));

    Router::new()
        // Public routes (no authentication required)
        .route("/", get(handlers::root::root))
        .route("/health", get(handlers::health::health_check))
        .route("/admin/token", post(handlers::auth::login_for_access_token))
        .merge(authenticated_routes)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::rate_limit::rate_limit_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
