//! Wallet configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use warden_types::ChainId;
use warden_utils::LogFormat;

use crate::error::WalletError;

/// Exclusive upper bound on the expiration window of a new transaction.
pub const MAX_TIME_UNTIL_EXPIRATION: u32 = 3600;

/// Configuration for a wallet instance.
///
/// Loaded from a TOML file via [`WalletConfig::from_toml_file`] or built
/// programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Ledger node endpoint; recorded in the wallet file as `ws_server`.
    #[serde(default = "default_server_rpc_endpoint")]
    pub server_rpc_endpoint: String,

    #[serde(default = "default_wallet_file")]
    pub wallet_file: PathBuf,

    /// Hex chain id. When absent it is fetched from the node once.
    #[serde(default)]
    pub chain_id: Option<String>,

    /// Seconds between head block time and transaction expiration.
    #[serde(default = "default_tx_expiration_seconds")]
    pub tx_expiration_seconds: u32,

    #[serde(default = "default_rpc_timeout_secs")]
    pub rpc_timeout_secs: u64,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_server_rpc_endpoint() -> String {
    "http://127.0.0.1:9191".to_string()
}

fn default_wallet_file() -> PathBuf {
    PathBuf::from("wallet.json")
}

fn default_tx_expiration_seconds() -> u32 {
    30
}

fn default_rpc_timeout_secs() -> u64 {
    30
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl WalletConfig {
    /// Load and validate configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, WalletError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| WalletError::Config(format!("{}: {e}", path.as_ref().display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, WalletError> {
        let config: Self = toml::from_str(s).map_err(|e| WalletError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, WalletError> {
        toml::to_string_pretty(self).map_err(|e| WalletError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), WalletError> {
        if self.tx_expiration_seconds >= MAX_TIME_UNTIL_EXPIRATION {
            return Err(WalletError::Config(format!(
                "tx_expiration_seconds must be below {MAX_TIME_UNTIL_EXPIRATION}"
            )));
        }
        self.parsed_chain_id()?;
        self.parsed_log_format()?;
        Ok(())
    }

    pub fn parsed_chain_id(&self) -> Result<Option<ChainId>, WalletError> {
        self.chain_id
            .as_deref()
            .map(|hex| {
                hex.parse::<ChainId>()
                    .map_err(|e| WalletError::Config(format!("chain_id: {e}")))
            })
            .transpose()
    }

    pub fn parsed_log_format(&self) -> Result<LogFormat, WalletError> {
        self.log_format
            .parse()
            .map_err(|e| WalletError::Config(format!("log_format: {e}")))
    }

    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc_timeout_secs)
    }

    /// Install the global tracing subscriber with this format and level.
    pub fn init_logging(&self) -> Result<(), WalletError> {
        warden_utils::init_logging(self.parsed_log_format()?, &self.log_level)
            .map_err(|e| WalletError::Config(e.to_string()))
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            server_rpc_endpoint: default_server_rpc_endpoint(),
            wallet_file: default_wallet_file(),
            chain_id: None,
            tx_expiration_seconds: default_tx_expiration_seconds(),
            rpc_timeout_secs: default_rpc_timeout_secs(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}
