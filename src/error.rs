use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn, Level};
use utoipa::ToSchema;

/// Cache collaborator failures
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
}

/// Ledger collaborator failures
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The peer has no committed transaction with this ID
    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),
    #[error("Ledger transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Ledger peer error ({status}): {message}")]
    Peer { status: u16, message: String },
    #[error("Failed to decode ledger response: {0}")]
    Decode(String),
}

impl From<prost::DecodeError> for LedgerError {
    fn from(err: prost::DecodeError) -> Self {
        LedgerError::Decode(err.to_string())
    }
}

impl From<base64::DecodeError> for LedgerError {
    fn from(err: base64::DecodeError) -> Self {
        LedgerError::Decode(err.to_string())
    }
}

/// Body returned for every non-200 response
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status: reason_phrase(status),
            reason: None,
            timestamp: timestamp_now(),
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Cache(_) | ApiError::Ledger(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine readable reason attached to the body, if any
    fn reason(&self) -> Option<&'static str> {
        match self {
            ApiError::Unauthorized(_) => Some("NO_VALID_APIKEY"),
            _ => None,
        }
    }

    /// Level the error is logged at when turned into a response.
    ///
    /// Not-found is ordinary control flow. Collaborator failures are already
    /// logged with context by the handler that hit them.
    fn log_level(&self) -> Level {
        match self {
            ApiError::NotFound(_) | ApiError::Cache(_) | ApiError::Ledger(_) => Level::DEBUG,
            ApiError::Unauthorized(_) | ApiError::ServiceUnavailable(_) => Level::WARN,
        }
    }

    fn log_error(&self) {
        match self.log_level() {
            Level::DEBUG => debug!(error = %self, "Request failed"),
            _ => warn!(error = %self, "Request rejected"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        self.log_error();

        let mut body = ErrorResponse::new(status);
        if let Some(reason) = self.reason() {
            body = body.with_reason(reason);
        }

        (status, Json(body)).into_response()
    }
}

/// HTTP reason phrase for a status code, e.g. `Not Found`
pub fn reason_phrase(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or_else(|| status.as_str())
        .to_string()
}

/// Current instant in ISO-8601 with millisecond precision, e.g. `2024-01-01T00:00:00.000Z`
pub fn timestamp_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::NotFound("txn".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Ledger(LedgerError::Decode("bad".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::ServiceUnavailable("redis".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_collaborator_failures_are_not_logged_again() {
        let cache = ApiError::Cache(CacheError::from(redis::RedisError::from((
            redis::ErrorKind::IoError,
            "connection refused",
        ))));
        assert_eq!(cache.log_level(), Level::DEBUG);
        assert_eq!(
            ApiError::Ledger(LedgerError::Decode("bad".into())).log_level(),
            Level::DEBUG
        );
        assert_eq!(ApiError::NotFound("txn".into()).log_level(), Level::DEBUG);
        assert_eq!(ApiError::Unauthorized("missing".into()).log_level(), Level::WARN);
    }

    #[test]
    fn test_reason_phrase() {
        assert_eq!(reason_phrase(StatusCode::OK), "OK");
        assert_eq!(
            reason_phrase(StatusCode::INTERNAL_SERVER_ERROR),
            "Internal Server Error"
        );
    }

    #[test]
    fn test_timestamp_is_rfc3339() {
        let ts = timestamp_now();
        assert!(ts.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }

    #[test]
    fn test_error_body_omits_missing_reason() {
        let body = serde_json::to_value(ErrorResponse::new(StatusCode::NOT_FOUND)).unwrap();
        assert_eq!(body["status"], "Not Found");
        assert!(body.get("reason").is_none());
    }
}
