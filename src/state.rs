//! Shared application state handed to every handler and middleware.

use std::sync::Arc;

use crate::{
    config::Config,
    db::{self, DbPool},
    services::{admin_service, rate_limiter::RateLimiter, token_service::TokenService},
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    /// Read-only after startup; shared without locking.
    pub tokens: Arc<TokenService>,
    /// The only in-process mutable state.
    pub limiter: Arc<RateLimiter>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Open the store, apply the schema, bootstrap the admin user and build
    /// the token service and rate limiter.
    ///
    /// # Startup Flow
    ///
    /// 1. Create database connection pool
    /// 2. Run database migrations
    /// 3. Ensure the administrator account exists
    /// 4. Resolve the signing secret and algorithm
    pub async fn initialize(config: Config) -> anyhow::Result<Self> {
        let pool = db::create_pool(&config.database_url).await?;
        tracing::info!("Database pool created");

        db::run_migrations(&pool).await?;
        tracing::info!("Database migrations complete");

        admin_service::bootstrap(&pool, &config.admin_username, &config.admin_password).await?;

        let tokens = TokenService::from_config(&config)?;
        let limiter = RateLimiter::new(config.rate_limit_requests, config.rate_limit_window())
            .with_max_clients(config.rate_limit_max_clients);

        Ok(Self {
            pool,
            tokens: Arc::new(tokens),
            limiter: Arc::new(limiter),
            config: Arc::new(config),
        })
    }
}
