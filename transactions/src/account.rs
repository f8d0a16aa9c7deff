//! Account creation and authority / metadata updates.

use serde::{Deserialize, Serialize};
use warden_types::{AccountName, Asset, Authority, PublicKey};

/// Create a new account controlled by the given authorities.
///
/// The fee is the explicit account-creation fee chosen by the creator and is
/// never overwritten by the fee schedule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountCreateOp {
    pub fee: Asset,
    pub creator: AccountName,
    pub name_seed: String,
    pub owner: Authority,
    pub active: Authority,
    pub memo_key: PublicKey,
    pub json_metadata: String,
}

/// Replace an account's authorities, memo key or metadata.
///
/// A present `owner` makes the update require the owner authority.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountUpdateOp {
    pub fee: Asset,
    pub account: AccountName,
    pub owner: Option<Authority>,
    pub active: Option<Authority>,
    pub memo_key: PublicKey,
    pub json_metadata: String,
}
