//! The remote ledger service the wallet queries and broadcasts to.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use warden_transactions::{FeeSchedule, Transaction};
use warden_types::{AccountName, Authority, BlockId, ChainId, PublicKey, Timestamp, TransactionId};

use crate::error::WalletError;

/// An account as reported by the chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountObject {
    pub name: AccountName,
    pub owner: Authority,
    pub active: Authority,
    pub memo_key: PublicKey,
    #[serde(default)]
    pub json_metadata: String,
}

/// Head-of-chain state used to stamp new transactions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicGlobalProperties {
    pub head_block_number: u32,
    pub head_block_id: BlockId,
    pub time: Timestamp,
}

/// Where a synchronously broadcast transaction was included.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastConfirmation {
    pub id: TransactionId,
    pub block_num: u32,
    pub trx_num: u32,
}

/// Queries and submission against the ledger service.
///
/// `get_accounts` answers one entry per requested name, `None` for names the
/// chain does not know. A failed `broadcast_transaction_synchronous` carries
/// the service's detail message in `WalletError::Node`.
#[allow(async_fn_in_trait)]
pub trait RemoteNode {
    async fn get_accounts(
        &self,
        names: &[AccountName],
    ) -> Result<Vec<Option<AccountObject>>, WalletError>;

    async fn get_chain_id(&self) -> Result<ChainId, WalletError>;

    async fn get_dynamic_global_properties(&self) -> Result<DynamicGlobalProperties, WalletError>;

    async fn get_fee_schedule(&self) -> Result<FeeSchedule, WalletError>;

    /// Accounts referencing each key, one list per requested key.
    async fn get_key_references(
        &self,
        keys: &[PublicKey],
    ) -> Result<Vec<Vec<AccountName>>, WalletError>;

    async fn broadcast_transaction_synchronous(
        &self,
        tx: &Transaction,
    ) -> Result<BroadcastConfirmation, WalletError>;
}

// ── NodeClient ──────────────────────────────────────────────────────────

/// JSON-RPC 2.0 client for a ledger node over HTTP.
pub struct NodeClient {
    http: reqwest::Client,
    node_url: String,
    next_id: AtomicU64,
}

impl NodeClient {
    /// Create a client for `node_url` (e.g. `http://127.0.0.1:9191`) with the
    /// given request timeout.
    pub fn new(node_url: impl Into<String>, timeout: Duration) -> Result<Self, WalletError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| WalletError::Node(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            node_url: node_url.into(),
            next_id: AtomicU64::new(1),
        })
    }

    pub fn node_url(&self) -> &str {
        &self.node_url
    }

    /// Send a JSON-RPC request and decode its `result` member.
    async fn rpc_call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<T, WalletError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        debug!(method, id, "rpc call");

        let response = self
            .http
            .post(&self.node_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| WalletError::Node(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(WalletError::Node(format!(
                "node returned HTTP {}",
                response.status()
            )));
        }

        let mut json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| WalletError::Node(format!("invalid JSON response: {e}")))?;

        if let Some(err) = json.get("error") {
            let message = err
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| err.to_string());
            return Err(WalletError::Node(message));
        }

        let result = json
            .get_mut("result")
            .map(serde_json::Value::take)
            .ok_or_else(|| WalletError::Node(format!("{method}: response has no result")))?;
        serde_json::from_value(result)
            .map_err(|e| WalletError::Node(format!("invalid {method} response: {e}")))
    }
}

impl RemoteNode for NodeClient {
    async fn get_accounts(
        &self,
        names: &[AccountName],
    ) -> Result<Vec<Option<AccountObject>>, WalletError> {
        self.rpc_call("get_accounts", serde_json::json!([names])).await
    }

    async fn get_chain_id(&self) -> Result<ChainId, WalletError> {
        self.rpc_call("get_chain_id", serde_json::json!([])).await
    }

    async fn get_dynamic_global_properties(&self) -> Result<DynamicGlobalProperties, WalletError> {
        self.rpc_call("get_dynamic_global_properties", serde_json::json!([]))
            .await
    }

    async fn get_fee_schedule(&self) -> Result<FeeSchedule, WalletError> {
        self.rpc_call("get_fee_schedule", serde_json::json!([])).await
    }

    async fn get_key_references(
        &self,
        keys: &[PublicKey],
    ) -> Result<Vec<Vec<AccountName>>, WalletError> {
        self.rpc_call("get_key_references", serde_json::json!([keys]))
            .await
    }

    async fn broadcast_transaction_synchronous(
        &self,
        tx: &Transaction,
    ) -> Result<BroadcastConfirmation, WalletError> {
        self.rpc_call("broadcast_transaction_synchronous", serde_json::json!([tx]))
            .await
    }
}
