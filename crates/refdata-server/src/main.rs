//! Refdata HTTP server binary.

use clap::Parser;
use refdata_core::{CatalogService, StorageConfig};
use refdata_server::{create_router, AppState, Args, ServerConfig};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Parse command line args
    let args = Args::parse();
    let config = ServerConfig::from(&args);

    info!(
        listen = %config.listen_addr,
        data = %config.data_path.display(),
        "Starting refdata server"
    );

    // Open the store
    let storage = StorageConfig::new(&config.data_path)
        .with_cache_capacity(config.cache_capacity);
    let service = CatalogService::open(storage)?;
    if service.store().was_recovered() {
        info!("Store recovered from a previous unclean shutdown");
    }

    // Create application state and router
    let state = AppState::new(service);
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!("Server listening on {}", config.listen_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
