use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod error;
mod middleware;
mod models;
mod routes;
mod state;

use common::database;
use common::jwt::{JwtConfig, JwtService};
use common::settings::ServerConfig;
use kitchen::Kitchen;
use kitchen::scraper::{HttpScraper, ScraperConfig};
use kitchen::store::PgStore;

use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting API service");

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

    let scraper = HttpScraper::new(&ScraperConfig::from_env())?;

    let app_state = AppState {
        kitchen: Kitchen::new(Arc::new(PgStore::new(pool)), Arc::new(scraper)),
        jwt_service: JwtService::new(JwtConfig::from_env()?),
    };

    info!("API service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state);

    let server = ServerConfig::from_env(3001)?;
    let listener = tokio::net::TcpListener::bind(server.address()).await?;
    info!("API service listening on {}", server.address());

    axum::serve(listener, app).await?;

    Ok(())
}
