use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

/// System chaincode that answers ledger queries on every peer.
pub const QUERY_SYSTEM_CONTRACT: &str = "qscc";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub environment: String,
    pub port: u16,
    pub log_level: String,
    pub log_format: LogFormat,
    pub redis_url: String,
    pub ledger: LedgerConfig,
    /// Accepted `X-Api-Key` values. Empty disables API key checks.
    pub api_keys: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Peer gateway connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    pub gateway_url: String,
    pub channel_name: String,
    pub request_timeout_secs: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            gateway_url: "http://localhost:7080".to_string(),
            channel_name: "mychannel".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            redis_url: "redis://127.0.0.1:6379".to_string(),
            ledger: LedgerConfig::default(),
            api_keys: Vec::new(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let log_format = match env::var("LOG_FORMAT")
            .unwrap_or_else(|_| "pretty".to_string())
            .to_lowercase()
            .as_str()
        {
            "json" => LogFormat::Json,
            "pretty" => LogFormat::Pretty,
            other => return Err(anyhow::anyhow!("Unsupported LOG_FORMAT: {}", other)),
        };

        Ok(Config {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            log_format,
            redis_url: env::var("REDIS_URL")
                .map_err(|_| anyhow::anyhow!("REDIS_URL environment variable is required"))?,
            ledger: LedgerConfig {
                gateway_url: env::var("LEDGER_GATEWAY_URL").map_err(|_| {
                    anyhow::anyhow!("LEDGER_GATEWAY_URL environment variable is required")
                })?,
                channel_name: env::var("HLF_CHANNEL_NAME")
                    .unwrap_or_else(|_| "mychannel".to_string()),
                request_timeout_secs: env::var("LEDGER_REQUEST_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .unwrap_or(30),
            },
            api_keys: parse_api_keys(&env::var("API_KEYS").unwrap_or_default()),
        })
    }

    pub fn api_key_auth_enabled(&self) -> bool {
        !self.api_keys.is_empty()
    }
}

fn parse_api_keys(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_api_keys_skips_blanks() {
        assert_eq!(
            parse_api_keys(" org1-key, ,org2-key,"),
            vec!["org1-key".to_string(), "org2-key".to_string()]
        );
        assert!(parse_api_keys("").is_empty());
    }

    #[test]
    fn test_default_config_disables_api_keys() {
        let config = Config::default();
        assert!(!config.api_key_auth_enabled());
        assert_eq!(config.ledger.channel_name, "mychannel");
    }
}
