use axum::{extract::State, http::StatusCode, response::Json};
use tracing::warn;

use crate::app_state::AppState;
use crate::error::ApiError;
use crate::handlers::response::ProbeResponse;

/// Liveness probe
#[utoipa::path(
    get,
    path = "/live",
    tag = "health",
    responses(
        (status = 200, description = "Process is running", body = ProbeResponse)
    )
)]
pub async fn live() -> Json<ProbeResponse> {
    Json(ProbeResponse::new(StatusCode::OK))
}

/// Readiness probe: the cache and the ledger peer must both answer
#[utoipa::path(
    get,
    path = "/ready",
    tag = "health",
    responses(
        (status = 200, description = "Dependencies reachable", body = ProbeResponse),
        (status = 503, description = "A dependency is unavailable", body = ProbeResponse)
    )
)]
pub async fn ready(State(state): State<AppState>) -> Result<Json<ProbeResponse>, ApiError> {
    if let Err(e) = state.cache.ping().await {
        warn!("Readiness check failed for cache: {}", e);
        return Err(ApiError::ServiceUnavailable("cache".to_string()));
    }

    if let Err(e) = state.ledger.get_chain_info().await {
        warn!(
            channel = %state.ledger.channel_name(),
            "Readiness check failed for ledger: {}", e
        );
        return Err(ApiError::ServiceUnavailable("ledger".to_string()));
    }

    Ok(Json(ProbeResponse::new(StatusCode::OK)))
}
