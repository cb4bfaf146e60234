// Data models for cache records, ledger results and status responses

pub mod transaction;

pub use transaction::{
    LedgerTransactionResult, Progress, TransactionRecord, TransactionStatus, ValidationCode,
};
