// Services module - cache and ledger collaborators

pub mod cache_service;
pub mod ledger;

pub use cache_service::{CacheService, TransactionCache};
pub use ledger::{GatewayLedgerClient, LedgerClient, LedgerQueryService};
