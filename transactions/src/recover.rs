//! Account recovery: prove control of a recent owner authority to install a
//! new one.

use serde::{Deserialize, Serialize};
use warden_types::{AccountName, Asset, Authority};

/// Both authorities must sign, so neither is tied to a single account's
/// active or owner authority.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoverAccountOp {
    pub fee: Asset,
    pub account_to_recover: AccountName,
    pub new_owner_authority: Authority,
    pub recent_owner_authority: Authority,
}
