//! Transfer: move an asset between two accounts, with an optional memo.

use serde::{Deserialize, Serialize};
use warden_types::{AccountName, Asset};

/// A transfer operation.
///
/// `memo` is either plain text or an encrypted envelope beginning with `#`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferOp {
    pub fee: Asset,
    pub from: AccountName,
    pub to: AccountName,
    pub amount: Asset,
    pub memo: String,
}
