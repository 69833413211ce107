//! Rate limiting middleware.
//!
//! Applied to every route. Clients are identified by peer IP address; requests
//! served without connection info (e.g. in-process tests) share the
//! `"unknown"` client.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};

use crate::{error::AppError, services::rate_limiter::RateLimitDecision, state::AppState};

const UNKNOWN_CLIENT: &str = "unknown";

/// Requests the client may still make in the current window.
pub const RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";

/// Admit or reject the request before any other work is done.
///
/// # Returns
///
/// - `Ok(Response)` from the next handler, with `X-RateLimit-Remaining`,
///   when the client is within budget
/// - `Err(AppError::RateLimited)` (429 with `Retry-After`) otherwise
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let client = client_id(&request);

    let remaining = match state.limiter.check(&client) {
        RateLimitDecision::Admitted { remaining } => remaining,
        RateLimitDecision::Throttled { retry_after } => {
            tracing::warn!(client = %client, path = %request.uri().path(), "Rate limit exceeded");
            return Err(AppError::RateLimited {
                // Round up so clients never retry before the window has moved.
                retry_after_secs: retry_after.as_secs()
                    + u64::from(retry_after.subsec_nanos() > 0),
            });
        }
    };

    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(
            HeaderName::from_static(RATE_LIMIT_REMAINING),
            HeaderValue::from(remaining),
        );

    Ok(response)
}

fn client_id(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}
