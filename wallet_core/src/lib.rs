//! Client-side signing core of the Warden wallet.
//!
//! - [`vault`]: password-protected key store with lock/unlock discipline
//! - [`derivation`]: deterministic key sequences and account key hierarchies
//! - [`authorizer`]: fee assignment, authority resolution, minimal signing
//!   and broadcast
//! - [`solver`]: the pluggable minimal-signature solver
//! - [`memo`]: end-to-end memo encryption and the sensitive-data guard
//! - [`remote`]: the ledger node seam and its JSON-RPC client
//! - [`wallet`]: the facade tying the pieces into one owned context

pub mod authorizer;
pub mod config;
pub mod derivation;
pub mod error;
pub mod memo;
pub mod remote;
pub mod solver;
pub mod vault;
pub mod wallet;
pub mod wallet_file;

pub use authorizer::{TransactionAuthorizer, DEFAULT_TX_EXPIRATION_SECS};
pub use config::{WalletConfig, MAX_TIME_UNTIL_EXPIRATION};
pub use derivation::{
    account_key_triple, derive_child, find_first_unused_index, key_from_password, AccountKeys,
    UNUSED_KEY_LOOKAHEAD,
};
pub use error::WalletError;
pub use memo::{check_memo, decrypt_memo, encrypt_memo, MemoData, NonceSource, MEMO_MARKER};
pub use remote::{
    AccountObject, BroadcastConfirmation, DynamicGlobalProperties, NodeClient, RemoteNode,
};
pub use solver::{AuthorityMinimizer, SignatureMinimizer, MAX_SIG_CHECK_DEPTH};
pub use vault::KeyVault;
pub use wallet::{SharedWallet, Wallet};
pub use wallet_file::{copy_wallet_file, load_wallet_data, save_wallet_data, WalletData};
