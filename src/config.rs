//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment variables into a type-safe struct.
//!
//! Every field has a development default. A production deployment must at least
//! override `SECRET_KEY` and `ADMIN_PASSWORD`.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

/// Longest accepted token lifetime: one year.
pub const MAX_TOKEN_EXPIRE_MINUTES: i64 = 60 * 24 * 365;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read environment: {0}")]
    Env(#[from] envy::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: SQLite connection string, defaults to `sqlite://nmssentinel.db`
/// - `SECRET_KEY`: token signing secret, generated per process when unset
/// - `ALGORITHM`: token signing algorithm, defaults to `HS256`
/// - `ACCESS_TOKEN_EXPIRE_MINUTES`: token lifetime, defaults to 30
/// - `HOST` / `PORT`: bind address, defaults to `127.0.0.1:8000`
/// - `ADMIN_USERNAME` / `ADMIN_PASSWORD`: bootstrap administrator credentials
/// - `RATE_LIMIT_REQUESTS` / `RATE_LIMIT_WINDOW_SECONDS`: sliding window, defaults to 100 per 60s
/// - `RATE_LIMIT_MAX_CLIENTS`: upper bound on tracked clients
#[derive(Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_database_url")]
    pub database_url: String,

    #[serde(default)]
    pub secret_key: Option<String>,

    #[serde(default = "default_algorithm")]
    pub algorithm: String,

    #[serde(default = "default_token_expire_minutes")]
    pub access_token_expire_minutes: i64,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_admin_username")]
    pub admin_username: String,

    #[serde(default = "default_admin_password")]
    pub admin_password: String,

    #[serde(default = "default_rate_limit_requests")]
    pub rate_limit_requests: usize,

    #[serde(default = "default_rate_limit_window_seconds")]
    pub rate_limit_window_seconds: u64,

    #[serde(default = "default_rate_limit_max_clients")]
    pub rate_limit_max_clients: usize,
}

fn default_database_url() -> String {
    "sqlite://nmssentinel.db".to_string()
}

fn default_algorithm() -> String {
    "HS256".to_string()
}

fn default_token_expire_minutes() -> i64 {
    30
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

/// Default port if PORT environment variable is not set.
fn default_port() -> u16 {
    8000
}

fn default_admin_username() -> String {
    "admin".to_string()
}

fn default_admin_password() -> String {
    "adminpass".to_string()
}

fn default_rate_limit_requests() -> usize {
    100
}

fn default_rate_limit_window_seconds() -> u64 {
    60
}

fn default_rate_limit_max_clients() -> usize {
    100_000
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable value cannot be parsed into
    /// its expected type (e.g. a non-numeric `PORT`), or if a value is out of
    /// range (see [`Config::validate`]).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        // Field names are automatically converted: database_url -> DATABASE_URL
        let config = envy::from_env::<Config>()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that parse but cannot work.
    ///
    /// `ACCESS_TOKEN_EXPIRE_MINUTES` must be between 1 and
    /// [`MAX_TOKEN_EXPIRE_MINUTES`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_TOKEN_EXPIRE_MINUTES).contains(&self.access_token_expire_minutes) {
            return Err(ConfigError::Invalid(format!(
                "ACCESS_TOKEN_EXPIRE_MINUTES must be between 1 and {MAX_TOKEN_EXPIRE_MINUTES}, got {}",
                self.access_token_expire_minutes
            )));
        }

        Ok(())
    }

    /// Signing secret supplied by the environment, ignoring blank values.
    pub fn configured_secret(&self) -> Option<&str> {
        self.secret_key
            .as_deref()
            .map(str::trim)
            .filter(|secret| !secret.is_empty())
    }

    /// Lifetime of issued access tokens.
    ///
    /// Saturates for values beyond what a `Duration` holds; issuing with such a
    /// lifetime then fails instead of panicking.
    pub fn access_token_ttl(&self) -> chrono::Duration {
        chrono::Duration::try_minutes(self.access_token_expire_minutes)
            .unwrap_or(chrono::Duration::MAX)
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_seconds)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            secret_key: None,
            algorithm: default_algorithm(),
            access_token_expire_minutes: default_token_expire_minutes(),
            host: default_host(),
            port: default_port(),
            admin_username: default_admin_username(),
            admin_password: default_admin_password(),
            rate_limit_requests: default_rate_limit_requests(),
            rate_limit_window_seconds: default_rate_limit_window_seconds(),
            rate_limit_max_clients: default_rate_limit_max_clients(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &self.database_url)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "[hidden]"))
            .field("algorithm", &self.algorithm)
            .field("access_token_expire_minutes", &self.access_token_expire_minutes)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("admin_username", &self.admin_username)
            .field("admin_password", &"[hidden]")
            .field("rate_limit_requests", &self.rate_limit_requests)
            .field("rate_limit_window_seconds", &self.rate_limit_window_seconds)
            .field("rate_limit_max_clients", &self.rate_limit_max_clients)
            .finish()
    }
}
