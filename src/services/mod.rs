//! Business logic services.
//!
//! Services contain core business logic separated from HTTP handlers.

pub mod admin_service;
pub mod credential_store;
pub mod password;
pub mod rate_limiter;
pub mod token_service;
