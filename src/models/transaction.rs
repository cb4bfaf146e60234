//! Transaction status models.
//!
//! Covers the locally tracked submission record kept in the cache, the
//! committed ledger outcome, and the derived progress reported to clients.

use std::collections::HashMap;
use std::fmt;

use prost::Message;
use serde::{Serialize, Serializer};
use utoipa::ToSchema;

/// Submission progress as observed by the status endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Progress {
    /// Submitted and not yet retried
    Accepted,
    /// Submission is being retried
    Retrying,
    /// Final outcome is committed on the ledger
    Done,
}

/// Submission tracking record stored as a cache hash under `txn:{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionRecord {
    pub state: Option<String>,
    pub retries: u32,
}

impl TransactionRecord {
    /// Cache key holding the record for a transaction ID.
    pub fn cache_key(transaction_id: &str) -> String {
        format!("txn:{}", transaction_id)
    }

    /// Build a record from raw hash fields.
    ///
    /// Missing or non-numeric `retries` read as zero.
    pub fn from_fields(fields: &HashMap<String, String>) -> Self {
        Self {
            state: fields.get("state").filter(|s| !s.is_empty()).cloned(),
            retries: fields
                .get("retries")
                .and_then(|r| r.trim().parse().ok())
                .unwrap_or(0),
        }
    }

    /// Progress implied by the record, or `None` when the local tracker
    /// does not know the transaction.
    pub fn progress(&self) -> Option<Progress> {
        self.state.as_ref()?;
        if self.retries > 0 {
            Some(Progress::Retrying)
        } else {
            Some(Progress::Accepted)
        }
    }
}

/// Commit-time validation outcome of a ledger transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationCode {
    Valid,
    NilEnvelope,
    BadPayload,
    BadCommonHeader,
    BadCreatorSignature,
    InvalidEndorserTransaction,
    InvalidConfigTransaction,
    UnsupportedTxPayload,
    BadProposalTxid,
    DuplicateTxid,
    EndorsementPolicyFailure,
    MvccReadConflict,
    PhantomReadConflict,
    UnknownTxType,
    TargetChainNotFound,
    MarshalTxError,
    NilTxaction,
    ExpiredChaincode,
    ChaincodeVersionConflict,
    BadHeaderExtension,
    BadChannelHeader,
    BadResponsePayload,
    BadRwset,
    IllegalWriteset,
    InvalidWriteset,
    InvalidChaincode,
    NotValidated,
    InvalidOtherReason,
    /// Code outside the known table
    Unknown(i32),
}

const VALIDATION_CODES: &[(i32, ValidationCode, &str)] = &[
    (0, ValidationCode::Valid, "VALID"),
    (1, ValidationCode::NilEnvelope, "NIL_ENVELOPE"),
    (2, ValidationCode::BadPayload, "BAD_PAYLOAD"),
    (3, ValidationCode::BadCommonHeader, "BAD_COMMON_HEADER"),
    (4, ValidationCode::BadCreatorSignature, "BAD_CREATOR_SIGNATURE"),
    (5, ValidationCode::InvalidEndorserTransaction, "INVALID_ENDORSER_TRANSACTION"),
    (6, ValidationCode::InvalidConfigTransaction, "INVALID_CONFIG_TRANSACTION"),
    (7, ValidationCode::UnsupportedTxPayload, "UNSUPPORTED_TX_PAYLOAD"),
    (8, ValidationCode::BadProposalTxid, "BAD_PROPOSAL_TXID"),
    (9, ValidationCode::DuplicateTxid, "DUPLICATE_TXID"),
    (10, ValidationCode::EndorsementPolicyFailure, "ENDORSEMENT_POLICY_FAILURE"),
    (11, ValidationCode::MvccReadConflict, "MVCC_READ_CONFLICT"),
    (12, ValidationCode::PhantomReadConflict, "PHANTOM_READ_CONFLICT"),
    (13, ValidationCode::UnknownTxType, "UNKNOWN_TX_TYPE"),
    (14, ValidationCode::TargetChainNotFound, "TARGET_CHAIN_NOT_FOUND"),
    (15, ValidationCode::MarshalTxError, "MARSHAL_TX_ERROR"),
    (16, ValidationCode::NilTxaction, "NIL_TXACTION"),
    (17, ValidationCode::ExpiredChaincode, "EXPIRED_CHAINCODE"),
    (18, ValidationCode::ChaincodeVersionConflict, "CHAINCODE_VERSION_CONFLICT"),
    (19, ValidationCode::BadHeaderExtension, "BAD_HEADER_EXTENSION"),
    (20, ValidationCode::BadChannelHeader, "BAD_CHANNEL_HEADER"),
    (21, ValidationCode::BadResponsePayload, "BAD_RESPONSE_PAYLOAD"),
    (22, ValidationCode::BadRwset, "BAD_RWSET"),
    (23, ValidationCode::IllegalWriteset, "ILLEGAL_WRITESET"),
    (24, ValidationCode::InvalidWriteset, "INVALID_WRITESET"),
    (25, ValidationCode::InvalidChaincode, "INVALID_CHAINCODE"),
    (254, ValidationCode::NotValidated, "NOT_VALIDATED"),
    (255, ValidationCode::InvalidOtherReason, "INVALID_OTHER_REASON"),
];

impl ValidationCode {
    pub fn from_code(code: i32) -> Self {
        VALIDATION_CODES
            .iter()
            .find(|(value, _, _)| *value == code)
            .map(|(_, variant, _)| *variant)
            .unwrap_or(ValidationCode::Unknown(code))
    }

    /// Enumerant name as published by the ledger protocol.
    pub fn name(&self) -> &'static str {
        match self {
            ValidationCode::Unknown(_) => "UNKNOWN",
            known => VALIDATION_CODES
                .iter()
                .find(|(_, variant, _)| variant == known)
                .map(|(_, _, name)| *name)
                .unwrap_or("UNKNOWN"),
        }
    }
}

impl fmt::Display for ValidationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for ValidationCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Signed transaction envelope (`common.Envelope`).
#[derive(Clone, PartialEq, Message)]
pub struct Envelope {
    #[prost(bytes = "vec", tag = "1")]
    pub payload: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub signature: Vec<u8>,
}

/// Committed transaction as returned by `GetTransactionByID` (`protos.ProcessedTransaction`).
#[derive(Clone, PartialEq, Message)]
pub struct ProcessedTransaction {
    #[prost(message, optional, tag = "1")]
    pub transaction_envelope: Option<Envelope>,
    #[prost(int32, tag = "2")]
    pub validation_code: i32,
}

/// Decoded committed outcome of a ledger transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerTransactionResult {
    pub validation_code: ValidationCode,
}

impl LedgerTransactionResult {
    pub fn decode(bytes: &[u8]) -> Result<Self, prost::DecodeError> {
        let processed = ProcessedTransaction::decode(bytes)?;
        Ok(Self {
            validation_code: ValidationCode::from_code(processed.validation_code),
        })
    }
}

/// Status of a transaction after combining cache and ledger findings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionStatus {
    pub progress: Progress,
    pub validation_code: Option<ValidationCode>,
}

impl TransactionStatus {
    /// Combine the cache-derived progress with the ledger outcome.
    ///
    /// A committed ledger result always wins; without one the cache decides,
    /// and with neither the transaction is unknown.
    pub fn reconcile(
        cached: Option<Progress>,
        committed: Option<&LedgerTransactionResult>,
    ) -> Option<Self> {
        match (committed, cached) {
            (Some(result), _) => Some(Self {
                progress: Progress::Done,
                validation_code: Some(result.validation_code),
            }),
            (None, Some(progress)) => Some(Self {
                progress,
                validation_code: None,
            }),
            (None, None) => None,
        }
    }
}
