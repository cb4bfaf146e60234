use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use tracing::{debug, info};

use crate::error::CacheError;
use crate::models::TransactionRecord;

/// Read access to the submission tracking records kept in the cache.
#[async_trait]
pub trait TransactionCache: Send + Sync {
    /// Fetch the record for a transaction. An absent key yields an empty record.
    async fn transaction_record(
        &self,
        transaction_id: &str,
    ) -> std::result::Result<TransactionRecord, CacheError>;

    /// Round-trip check used by readiness probes.
    async fn ping(&self) -> std::result::Result<(), CacheError>;
}

/// Redis-backed transaction cache
#[derive(Clone)]
pub struct CacheService {
    connection_manager: ConnectionManager,
}

impl CacheService {
    /// Create new cache service instance
    pub async fn new(redis_url: &str) -> Result<Self> {
        info!("Initializing Redis cache service");

        let client = Client::open(redis_url)?;
        let connection_manager = ConnectionManager::new(client).await?;

        // Test connection
        let mut conn = connection_manager.clone();
        let _: String = conn.ping().await?;

        info!("✅ Redis cache connection established");

        Ok(Self { connection_manager })
    }
}

#[async_trait]
impl TransactionCache for CacheService {
    async fn transaction_record(
        &self,
        transaction_id: &str,
    ) -> std::result::Result<TransactionRecord, CacheError> {
        let key = TransactionRecord::cache_key(transaction_id);
        let mut conn = self.connection_manager.clone();

        let fields: HashMap<String, String> = conn.hgetall(&key).await?;
        debug!(
            transaction_id = %transaction_id,
            state = ?fields,
            "Saved transaction state"
        );

        Ok(TransactionRecord::from_fields(&fields))
    }

    async fn ping(&self) -> std::result::Result<(), CacheError> {
        let mut conn = self.connection_manager.clone();
        let _: String = conn.ping().await?;
        Ok(())
    }
}
