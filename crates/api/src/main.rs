use anyhow::Result;
use tokio::sync::watch;
use tracing::{info, warn};

use central_monitoring_api::{app, config, jobs, middleware};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = config::Config::load()?;

    middleware::logging::init_logging(&config.logging);
    middleware::init_metrics()?;

    info!(
        timezone = %config.monitoring.timezone,
        "Starting central monitoring API v{}",
        env!("CARGO_PKG_VERSION")
    );

    let pool = persistence::db::create_pool(&(&config.database).into()).await?;

    info!("Running database migrations...");
    persistence::db::run_migrations(&pool).await?;
    info!("Migrations completed");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let pool_metrics =
        jobs::spawn_pool_metrics(pool.clone(), jobs::POOL_METRICS_PERIOD, shutdown_rx);

    let addr = config.socket_addr()?;
    let app = app::create_app(config, pool)?;

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped, shutting down jobs");
    let _ = shutdown_tx.send(true);
    if let Err(e) = pool_metrics.await {
        warn!(error = %e, "Pool metrics job ended abnormally");
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
