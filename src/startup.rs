//! Application startup and initialization logic.

use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::config::{Config, LogFormat};
use crate::services::{CacheService, GatewayLedgerClient};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured `LOG_LEVEL`.
pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "ledger_api_gateway={},tower_http={}",
            config.log_level, config.log_level
        )
        .into()
    });

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match config.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

/// Connect collaborators and create the AppState.
pub async fn initialize_app(config: &Config) -> Result<AppState> {
    info!("🚀 Starting ledger API gateway ({})", config.environment);

    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install Prometheus recorder: {}", e))?;
    info!("✅ Prometheus metrics initialized");

    let cache = CacheService::new(&config.redis_url).await.map_err(|e| {
        error!("Failed to establish Redis connection: {}", e);
        anyhow::anyhow!("Redis connection failed: {}", e)
    })?;
    info!("✅ Cache service initialized");

    let ledger_client = GatewayLedgerClient::new(&config.ledger)
        .map_err(|e| anyhow::anyhow!("Failed to create ledger client: {}", e))?;
    info!(
        "✅ Ledger client initialized (gateway: {}, channel: {})",
        config.ledger.gateway_url, config.ledger.channel_name
    );

    if config.api_key_auth_enabled() {
        info!("🔑 API key authentication enabled ({} keys)", config.api_keys.len());
    } else {
        warn!("⚠️ API_KEYS not set, API key authentication is disabled");
    }

    Ok(
        AppState::new(config.clone(), Arc::new(cache), Arc::new(ledger_client))
            .with_metrics(metrics_handle),
    )
}

/// Wait for shutdown signal.
pub async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully");
        },
        _ = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully");
        },
    }
}
