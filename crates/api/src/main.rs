use anyhow::{Context, Result};
use std::time::Duration;
use tracing::{info, warn};

use domain::store::Stores;
use persistence::MemoryStore;
use taskboard_api::{
    app,
    config::{Config, StorageBackend},
    middleware, services,
};

const POOL_METRICS_INTERVAL: Duration = Duration::from_secs(15);

async fn open_stores(config: &Config) -> Result<Stores> {
    match config.storage.backend {
        StorageBackend::Postgres => {
            let db_config: persistence::db::DatabaseConfig = (&config.database).into();
            let pool = persistence::db::create_pool(&db_config)
                .await
                .context("Failed to connect to database")?;

            info!("Running database migrations...");
            persistence::db::run_migrations(&pool).await?;
            info!("Migrations completed");

            let metrics_pool = pool.clone();
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(POOL_METRICS_INTERVAL);
                loop {
                    interval.tick().await;
                    persistence::metrics::record_pool_metrics(&metrics_pool);
                }
            });

            Ok(persistence::postgres_stores(pool))
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage; data is lost on restart");
            Ok(MemoryStore::new().into_stores())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::load()?;
    config.validate()?;

    middleware::logging::init_logging(&config.logging)?;
    middleware::init_metrics()?;

    info!("Starting Taskboard API v{}", env!("CARGO_PKG_VERSION"));

    let stores = open_stores(&config).await?;

    let report = services::seed(&stores, &config.bootstrap).await?;
    if report.organizations_created + report.users_created > 0 {
        info!(
            organizations = report.organizations_created,
            users = report.users_created,
            "Seed data created"
        );
    }

    let addr = config.socket_addr();
    let app = app::create_app(config, stores)?;

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
