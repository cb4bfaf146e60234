pub mod health;
pub mod metrics;
pub mod response;
pub mod transactions;

// Re-export commonly used types
pub use response::{ProbeResponse, StatusResponse};
pub use transactions::transaction_routes;
