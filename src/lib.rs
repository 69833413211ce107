//! NMSSentinel admin backend.
//!
//! Authenticates a single administrator, issues bearer tokens and manages a
//! collection of opaque API keys, with every request passing a per-client
//! sliding-window rate limiter.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: SQLite with sqlx (async queries)
//! - **Authentication**: Argon2 password hashes, HMAC-signed JWT bearer tokens
//! - **Format**: JSON responses, form-encoded login

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
