//! Router configuration module
//!
//! Health, metrics and the OpenAPI document sit at the root without
//! authentication; everything under `/api` passes the API key check.

use axum::{middleware::from_fn, middleware::from_fn_with_state, routing::get, Json, Router};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;

use crate::app_state::AppState;
use crate::error::ErrorResponse;
use crate::handlers::{self, health, ProbeResponse, StatusResponse};
use crate::middleware::{api_key_middleware, metrics_middleware, request_logger_middleware};
use crate::models::Progress;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(title = "Ledger API Gateway", version = "0.1.0"),
    paths(
        handlers::transactions::status::get_transaction_status,
        handlers::health::live,
        handlers::health::ready,
        handlers::metrics::get_prometheus_metrics,
    ),
    components(schemas(StatusResponse, ProbeResponse, ErrorResponse, Progress))
)]
pub struct ApiDoc;

/// Build the application router.
pub fn build_router(app_state: AppState) -> Router {
    let api = Router::new()
        .nest("/transactions", handlers::transaction_routes())
        .layer(from_fn_with_state(app_state.clone(), api_key_middleware));

    Router::new()
        .route("/live", get(health::live))
        .route("/ready", get(health::ready))
        .route("/metrics", get(handlers::metrics::get_prometheus_metrics))
        .route("/api-docs/openapi.json", get(openapi_json))
        .nest("/api", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(from_fn(request_logger_middleware))
                .layer(from_fn(metrics_middleware))
                .layer(CorsLayer::permissive()),
        )
        .with_state(app_state)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
