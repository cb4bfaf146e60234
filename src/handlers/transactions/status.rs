// Transaction status handler
// Combines locally tracked submission progress with the committed ledger outcome

use axum::{
    extract::{Path, State},
    Json,
};
use metrics::counter;
use tracing::{debug, error};

use crate::app_state::AppState;
use crate::error::{ApiError, ErrorResponse};
use crate::handlers::response::StatusResponse;
use crate::models::TransactionStatus;

/// Get transaction status by ID
#[utoipa::path(
    get,
    path = "/api/transactions/{transactionId}",
    tag = "transactions",
    summary = "Get transaction status",
    description = "Report submission progress and, once committed, the ledger validation code",
    params(
        ("transactionId" = String, Path, description = "Transaction ID")
    ),
    responses(
        (status = 200, description = "Transaction status", body = StatusResponse),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("api_key" = [])
    )
)]
pub async fn get_transaction_status(
    State(app_state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> Result<Json<StatusResponse>, ApiError> {
    debug!(transaction_id = %transaction_id, "Read request received for transaction ID");

    let record = app_state
        .cache
        .transaction_record(&transaction_id)
        .await
        .map_err(|e| {
            error!(
                transaction_id = %transaction_id,
                "Redis error processing read request: {}", e
            );
            record_lookup("error");
            ApiError::from(e)
        })?;
    let cached = record.progress();
    debug!(
        transaction_id = %transaction_id,
        progress = ?cached,
        retries = record.retries,
        "Cache state observed"
    );

    let committed = app_state
        .ledger
        .get_transaction_by_id(&transaction_id)
        .await
        .map_err(|e| {
            error!(
                transaction_id = %transaction_id,
                "Ledger error processing read request: {}", e
            );
            record_lookup("error");
            ApiError::from(e)
        })?;

    match TransactionStatus::reconcile(cached, committed.as_ref()) {
        Some(status) => {
            record_lookup("found");
            Ok(Json(StatusResponse::from(status)))
        }
        None => {
            record_lookup("not_found");
            Err(ApiError::NotFound(format!("transaction {}", transaction_id)))
        }
    }
}

fn record_lookup(outcome: &'static str) {
    counter!("transaction_status_lookups_total", "outcome" => outcome).increment(1);
}
