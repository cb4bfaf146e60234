//! Ledger query access.
//!
//! `LedgerClient` is the transport seam: it evaluates a read-only contract
//! function on a peer and returns the raw result bytes. `LedgerQueryService`
//! layers the system-contract queries used by the gateway on top of it.

pub mod gateway;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::config::QUERY_SYSTEM_CONTRACT;
use crate::error::LedgerError;
use crate::models::LedgerTransactionResult;

pub use gateway::GatewayLedgerClient;

/// Evaluates read-only contract functions against a ledger peer.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    async fn evaluate_transaction(
        &self,
        contract: &str,
        function: &str,
        args: &[&str],
    ) -> Result<Vec<u8>, LedgerError>;
}

/// Queries against the peer's query system contract on one channel
#[derive(Clone)]
pub struct LedgerQueryService {
    client: Arc<dyn LedgerClient>,
    channel_name: String,
}

impl LedgerQueryService {
    pub fn new(client: Arc<dyn LedgerClient>, channel_name: impl Into<String>) -> Self {
        Self {
            client,
            channel_name: channel_name.into(),
        }
    }

    pub fn channel_name(&self) -> &str {
        &self.channel_name
    }

    /// Look up a committed transaction.
    ///
    /// Returns `Ok(None)` when the peer reports the transaction as not found;
    /// every other failure is an error.
    pub async fn get_transaction_by_id(
        &self,
        transaction_id: &str,
    ) -> Result<Option<LedgerTransactionResult>, LedgerError> {
        let evaluated = self
            .client
            .evaluate_transaction(
                QUERY_SYSTEM_CONTRACT,
                "GetTransactionByID",
                &[self.channel_name.as_str(), transaction_id],
            )
            .await;

        match evaluated {
            Ok(bytes) => {
                let result = LedgerTransactionResult::decode(&bytes)?;
                debug!(
                    transaction_id = %transaction_id,
                    validation_code = %result.validation_code,
                    "Committed transaction found"
                );
                Ok(Some(result))
            }
            Err(LedgerError::TransactionNotFound(_)) => {
                debug!(transaction_id = %transaction_id, "Transaction not on ledger");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Fetch channel info, used to check the peer is reachable.
    pub async fn get_chain_info(&self) -> Result<Vec<u8>, LedgerError> {
        self.client
            .evaluate_transaction(
                QUERY_SYSTEM_CONTRACT,
                "GetChainInfo",
                &[self.channel_name.as_str()],
            )
            .await
    }
}
