//! Response bodies shared by the status and health handlers.

use axum::http::StatusCode;
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{reason_phrase, timestamp_now};
use crate::models::{Progress, TransactionStatus};

/// Successful transaction status lookup
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    /// HTTP reason phrase, always `OK`
    pub status: String,
    pub progress: Progress,
    /// Validation code name, empty until the transaction is committed
    pub validation_code: String,
    /// ISO-8601 completion instant
    pub timestamp: String,
}

impl From<TransactionStatus> for StatusResponse {
    fn from(status: TransactionStatus) -> Self {
        Self {
            status: reason_phrase(StatusCode::OK),
            progress: status.progress,
            validation_code: status
                .validation_code
                .map(|code| code.name().to_string())
                .unwrap_or_default(),
            timestamp: timestamp_now(),
        }
    }
}

/// Bare `{status, timestamp}` body used by health probes
#[derive(Debug, Serialize, ToSchema)]
pub struct ProbeResponse {
    pub status: String,
    pub timestamp: String,
}

impl ProbeResponse {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status: reason_phrase(status),
            timestamp: timestamp_now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ValidationCode;

    #[test]
    fn test_status_response_field_names() {
        let body = serde_json::to_value(StatusResponse::from(TransactionStatus {
            progress: Progress::Done,
            validation_code: Some(ValidationCode::Valid),
        }))
        .unwrap();

        assert_eq!(body["status"], "OK");
        assert_eq!(body["progress"], "DONE");
        assert_eq!(body["validationCode"], "VALID");
        assert!(body["timestamp"].is_string());
    }

    #[test]
    fn test_pending_status_has_empty_code() {
        let body = StatusResponse::from(TransactionStatus {
            progress: Progress::Accepted,
            validation_code: None,
        });
        assert_eq!(body.validation_code, "");
    }
}
