//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (form or JSON body, extensions)
//! 2. Delegates to the admin service
//! 3. Returns HTTP response (JSON, status code)

/// API key management endpoints
pub mod api_keys;
/// Token endpoint
pub mod auth;
/// Health check endpoint
pub mod health;
/// Service banner
pub mod root;
