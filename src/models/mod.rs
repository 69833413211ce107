//! Data models representing database entities and API payloads.
//!
//! This module contains all data structures that map to database tables,
//! plus the request/response bodies of the admin endpoints.

/// API key record and creation request
pub mod api_key;
/// Access-token response and login form
pub mod token;
/// Administrator account model
pub mod user;
