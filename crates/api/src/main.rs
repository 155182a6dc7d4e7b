use std::time::Duration;

use anyhow::Result;
use tracing::info;

use symposium_api::app::{create_app, AppState};
use symposium_api::config::Config;
use symposium_api::jobs::{CleanupOtpsJob, JobScheduler, QuotaResetJob};
use symposium_api::middleware::{init_metrics, logging::init_logging};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::load()?;
    init_logging(&config.logging);
    init_metrics();

    info!("Starting Symposium API v{}", env!("CARGO_PKG_VERSION"));

    let pool = persistence::db::create_pool(&config.database.pool_settings()).await?;

    info!("Running database migrations...");
    sqlx::migrate!("../persistence/src/migrations")
        .run(&pool)
        .await?;
    info!("Migrations completed");

    let addr = config.socket_addr()?;
    let state = AppState::build(config, pool.clone());

    let mut scheduler = JobScheduler::new();
    scheduler.register(CleanupOtpsJob::new(pool));
    scheduler.register(QuotaResetJob::new(state.view_quota.clone()));
    scheduler.start();

    let app = create_app(state);

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.shutdown();
    scheduler.wait_for_shutdown(Duration::from_secs(10)).await;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::warn!("Failed to listen for shutdown signal");
    }
}
