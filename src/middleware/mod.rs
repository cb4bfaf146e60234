// Middleware module - authentication, logging and metrics

pub mod api_key;
pub mod metrics;
pub mod request_logger;

pub use api_key::api_key_middleware;
pub use metrics::metrics_middleware;
pub use request_logger::request_logger_middleware;
