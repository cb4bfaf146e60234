use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::LedgerClient;
use crate::config::LedgerConfig;
use crate::error::LedgerError;

/// Peer message emitted by the query system contract for an unknown transaction ID.
static TRANSACTION_NOT_FOUND: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"Failed to get transaction with id .*, error (?:Entry not found|no such transaction ID \[.*\]) in index",
    )
    .expect("transaction not found pattern is valid")
});

#[derive(Debug, Serialize)]
struct EvaluateRequest<'a> {
    function: &'a str,
    args: &'a [&'a str],
}

#[derive(Debug, Deserialize)]
struct EvaluateResponse {
    /// Base64 encoded contract result
    result: String,
}

#[derive(Debug, Deserialize)]
struct GatewayErrorBody {
    #[serde(default)]
    message: String,
}

/// Ledger client talking to a peer gateway's HTTP evaluate API
#[derive(Clone)]
pub struct GatewayLedgerClient {
    client: Client,
    base_url: String,
    channel_name: String,
}

impl GatewayLedgerClient {
    pub fn new(config: &LedgerConfig) -> Result<Self, LedgerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.gateway_url.trim_end_matches('/').to_string(),
            channel_name: config.channel_name.clone(),
        })
    }

    fn evaluate_url(&self, contract: &str) -> String {
        format!(
            "{}/channels/{}/chaincodes/{}/evaluate",
            self.base_url, self.channel_name, contract
        )
    }
}

#[async_trait]
impl LedgerClient for GatewayLedgerClient {
    async fn evaluate_transaction(
        &self,
        contract: &str,
        function: &str,
        args: &[&str],
    ) -> Result<Vec<u8>, LedgerError> {
        let url = self.evaluate_url(contract);
        debug!(contract = %contract, function = %function, "Evaluating transaction");

        let response = self
            .client
            .post(&url)
            .json(&EvaluateRequest { function, args })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let body: EvaluateResponse = response.json().await?;
            return Ok(STANDARD.decode(body.result.as_bytes())?);
        }

        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                warn!(
                    status = %status,
                    function = %function,
                    "Failed to read gateway error body: {}", e
                );
                String::new()
            }
        };
        let message = serde_json::from_str::<GatewayErrorBody>(&text)
            .map(|body| body.message)
            .unwrap_or(text);

        Err(classify_error(status, function, args, message))
    }
}

/// Map a failed evaluation onto a `LedgerError`, singling out unknown transactions.
///
/// Only the peer's own not-found message counts. A bare 404 from the gateway
/// (unknown channel or route) is a peer failure like any other.
fn classify_error(
    status: StatusCode,
    function: &str,
    args: &[&str],
    message: String,
) -> LedgerError {
    if function == "GetTransactionByID" && TRANSACTION_NOT_FOUND.is_match(&message) {
        let transaction_id = args.last().copied().unwrap_or_default();
        return LedgerError::TransactionNotFound(transaction_id.to_string());
    }

    warn!(status = %status, function = %function, "Ledger evaluation failed: {}", message);
    LedgerError::Peer {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_pattern_entry_not_found() {
        let message = "evaluate call to endorser returned error: chaincode response 500, \
                       Failed to get transaction with id abc123, error Entry not found in index";
        assert!(TRANSACTION_NOT_FOUND.is_match(message));
    }

    #[test]
    fn test_not_found_pattern_no_such_transaction() {
        let message = "Failed to get transaction with id abc123, error no such transaction ID [abc123] in index";
        assert!(TRANSACTION_NOT_FOUND.is_match(message));
    }

    #[test]
    fn test_not_found_pattern_id_with_comma() {
        let message = "Failed to get transaction with id a,b, error Entry not found in index";
        assert!(TRANSACTION_NOT_FOUND.is_match(message));

        let message =
            "Failed to get transaction with id a,b, error no such transaction ID [a,b] in index";
        assert!(TRANSACTION_NOT_FOUND.is_match(message));
    }

    #[test]
    fn test_classify_not_found_message() {
        let err = classify_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "GetTransactionByID",
            &["mychannel", "abc123"],
            "Failed to get transaction with id abc123, error Entry not found in index".to_string(),
        );
        assert!(matches!(err, LedgerError::TransactionNotFound(id) if id == "abc123"));
    }

    #[test]
    fn test_classify_other_failure() {
        let err = classify_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "GetTransactionByID",
            &["mychannel", "abc123"],
            "access denied".to_string(),
        );
        assert!(matches!(err, LedgerError::Peer { status: 500, .. }));
    }

    #[test]
    fn test_classify_bare_404_is_peer_failure() {
        let err = classify_error(
            StatusCode::NOT_FOUND,
            "GetTransactionByID",
            &["mychannel", "abc123"],
            String::new(),
        );
        assert!(matches!(err, LedgerError::Peer { status: 404, .. }));
    }

    #[test]
    fn test_classify_404_only_for_transaction_lookup() {
        let err = classify_error(
            StatusCode::NOT_FOUND,
            "GetChainInfo",
            &["mychannel"],
            "no such channel".to_string(),
        );
        assert!(matches!(err, LedgerError::Peer { status: 404, .. }));
    }

    #[test]
    fn test_evaluate_url_trims_trailing_slash() {
        let client = GatewayLedgerClient::new(&LedgerConfig {
            gateway_url: "http://peer0:7080/".to_string(),
            channel_name: "mychannel".to_string(),
            request_timeout_secs: 5,
        })
        .unwrap();
        assert_eq!(
            client.evaluate_url("qscc"),
            "http://peer0:7080/channels/mychannel/chaincodes/qscc/evaluate"
        );
    }
}
