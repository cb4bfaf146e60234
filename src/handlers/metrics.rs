// Metrics endpoint for Prometheus

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::app_state::AppState;
use crate::error::ApiError;

/// Prometheus metrics endpoint
///
/// # Errors
///
/// Returns 503 when no Prometheus recorder was installed at startup
#[utoipa::path(
    get,
    path = "/metrics",
    tag = "metrics",
    summary = "Prometheus metrics",
    responses(
        (status = 200, description = "Prometheus metrics", content_type = "text/plain"),
        (status = 503, description = "Metrics recorder not installed")
    )
)]
pub async fn get_prometheus_metrics(
    State(app_state): State<AppState>,
) -> Result<Response, ApiError> {
    let handle = app_state
        .metrics_handle
        .as_ref()
        .ok_or_else(|| ApiError::ServiceUnavailable("metrics recorder".to_string()))?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        handle.render(),
    )
        .into_response())
}
