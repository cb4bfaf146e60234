use std::net::SocketAddr;

use anyhow::Result;
use tracing::info;

use ledger_api_gateway::{build_router, startup, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration (reads .env first)
    let config = Config::from_env()?;

    startup::init_tracing(&config);
    info!("Loaded configuration for environment: {}", config.environment);

    let app_state = startup::initialize_app(&config).await?;
    let app = build_router(app_state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Starting ledger API gateway on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Setup graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(startup::shutdown_signal())
        .await?;

    Ok(())
}
