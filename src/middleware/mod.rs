//! HTTP middleware components.
//!
//! Middleware are functions that run before route handlers.
//! They can:
//! - Authenticate requests
//! - Throttle clients
//! - Short-circuit requests (reject unauthorized or over-limit callers)

/// Bearer token authentication middleware
pub mod auth;
/// Per-client sliding-window throttling
pub mod rate_limit;
