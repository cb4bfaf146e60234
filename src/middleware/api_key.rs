use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use metrics::counter;
use tracing::debug;

use crate::app_state::AppState;
use crate::error::ApiError;

pub const API_KEY_HEADER: &str = "X-Api-Key";

/// API key authentication middleware
///
/// Passes every request through when no keys are configured.
pub async fn api_key_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if !state.config.api_key_auth_enabled() {
        return next.run(request).await;
    }

    let presented = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|key| state.config.api_keys.iter().any(|k| k == key));

    match presented {
        Some(true) => {
            debug!("API key accepted");
            next.run(request).await
        }
        Some(false) => reject("invalid"),
        None => reject("missing"),
    }
}

fn reject(reason: &'static str) -> Response {
    counter!("auth_failures_total", "reason" => reason).increment(1);
    ApiError::Unauthorized(format!("{} API key", reason)).into_response()
}
