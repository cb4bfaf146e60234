//! Application state shared across all handlers.

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use crate::config::Config;
use crate::services::{LedgerClient, LedgerQueryService, TransactionCache};

/// Application state shared across handlers.
///
/// Collaborators are injected here once at startup; handlers never reach
/// for globals.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Config,
    /// Submission tracking records
    pub cache: Arc<dyn TransactionCache>,
    /// Ledger queries on the configured channel
    pub ledger: LedgerQueryService,
    /// Prometheus recorder handle, absent when no recorder was installed
    pub metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(
        config: Config,
        cache: Arc<dyn TransactionCache>,
        ledger_client: Arc<dyn LedgerClient>,
    ) -> Self {
        let ledger = LedgerQueryService::new(ledger_client, config.ledger.channel_name.clone());
        Self {
            config,
            cache,
            ledger,
            metrics_handle: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics_handle = Some(handle);
        self
    }
}
