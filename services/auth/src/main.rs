use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod error;
mod password;
mod rate_limiter;
mod routes;
mod validation;

use common::database;
use common::jwt::{JwtConfig, JwtService};
use common::settings::ServerConfig;
use kitchen::Kitchen;
use kitchen::scraper::{HttpScraper, ScraperConfig};
use kitchen::store::PgStore;

use crate::rate_limiter::{RateLimiter, RateLimiterConfig};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub kitchen: Kitchen,
    pub jwt_service: JwtService,
    pub rate_limiter: RateLimiter,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting authentication service");

    // Initialize database connection pool
    let db_config = database::DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;

    // Check database connectivity
    if database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    database::run_migrations(&pool).await?;

    let jwt_service = JwtService::new(JwtConfig::from_env()?);
    let scraper = HttpScraper::new(&ScraperConfig::from_env())?;

    let app_state = AppState {
        kitchen: Kitchen::new(Arc::new(PgStore::new(pool)), Arc::new(scraper)),
        jwt_service,
        rate_limiter: RateLimiter::new(RateLimiterConfig::default()),
    };

    info!("Authentication service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state);

    let server = ServerConfig::from_env(3000)?;
    let listener = tokio::net::TcpListener::bind(server.address()).await?;
    info!("Authentication service listening on {}", server.address());

    axum::serve(listener, app).await?;

    Ok(())
}
