use thiserror::Error;
use warden_crypto::CryptoError;
use warden_transactions::TransactionError;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("invalid private key: {0}")]
    InvalidKey(String),

    #[error("key not found: {0}")]
    KeyNotFound(String),

    #[error("missing account: {0}")]
    MissingAccount(String),

    #[error("malformed vault entry for {0}")]
    MalformedVaultEntry(String),

    #[error("memo contains sensitive data: {0}")]
    SensitiveDataDetected(String),

    #[error("broadcast rejected: {0}")]
    BroadcastRejected(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid wallet state: {0}")]
    InvalidState(String),

    #[error("wallet is locked")]
    Locked,

    #[error("node RPC error: {0}")]
    Node(String),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Transaction(#[from] TransactionError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("configuration error: {0}")]
    Config(String),
}
