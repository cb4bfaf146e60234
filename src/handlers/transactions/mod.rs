// Transaction Handlers
// Read-only status endpoint for submitted ledger transactions

pub mod status;

use axum::{routing::get, Router};

use crate::app_state::AppState;

pub use status::get_transaction_status;

/// Routes mounted under `/api/transactions`.
pub fn transaction_routes() -> Router<AppState> {
    Router::new().route("/{transaction_id}", get(get_transaction_status))
}
