//! GuestPass invitation redemption service
//!
//! Main application entry point

use tracing::info;

use GuestPass::{
    api,
    config::Settings,
    database::{connection::create_pool, connection::run_migrations, connection::PoolConfig},
    utils::logging,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging
    logging::init_logging(&settings.logging)?;

    info!("Starting GuestPass redemption service...");

    // Initialize database connection
    info!("Connecting to database...");
    let pool_config = PoolConfig {
        url: settings.database.url.clone(),
        max_connections: settings.database.max_connections,
        min_connections: settings.database.min_connections,
        ..PoolConfig::default()
    };
    let db_pool = create_pool(&pool_config).await?;

    // Run database migrations
    run_migrations(&db_pool).await?;

    // Wire repositories and services into the router state
    let state = AppState::new(db_pool);
    let app = api::router(state);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    info!("GuestPass listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("GuestPass has been shut down.");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install shutdown signal handler");
    }
}
