//! Operations, fees and transactions signed by the Warden wallet core.
//!
//! Operation types:
//! - **Transfer**: move an asset between accounts, optionally with a memo
//! - **AccountCreate**: register a new account with owner/active/memo keys
//! - **AccountUpdate**: replace an account's authorities, memo key or metadata
//! - **RecoverAccount**: install a new owner authority using a recent one
//!
//! Each operation reports the authorities that must sign it; the wallet only
//! consumes the resulting [`RequiredAuthorities`].

pub mod account;
pub mod error;
pub mod fee;
pub mod recover;
pub mod transaction;
pub mod transfer;
pub mod validation;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use warden_types::{AccountName, Asset, Authority};

pub use account::{AccountCreateOp, AccountUpdateOp};
pub use error::TransactionError;
pub use fee::FeeSchedule;
pub use recover::RecoverAccountOp;
pub use transaction::{AnnotatedTransaction, Transaction};
pub use transfer::TransferOp;

/// Authorities whose signatures a set of operations needs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequiredAuthorities {
    pub active: BTreeSet<AccountName>,
    pub owner: BTreeSet<AccountName>,
    pub other: Vec<Authority>,
}

/// The unified operation enum.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    Transfer(TransferOp),
    AccountCreate(AccountCreateOp),
    AccountUpdate(AccountUpdateOp),
    RecoverAccount(RecoverAccountOp),
}

impl Operation {
    pub fn fee(&self) -> &Asset {
        match self {
            Self::Transfer(op) => &op.fee,
            Self::AccountCreate(op) => &op.fee,
            Self::AccountUpdate(op) => &op.fee,
            Self::RecoverAccount(op) => &op.fee,
        }
    }

    pub fn set_fee(&mut self, fee: Asset) {
        match self {
            Self::Transfer(op) => op.fee = fee,
            Self::AccountCreate(op) => op.fee = fee,
            Self::AccountUpdate(op) => op.fee = fee,
            Self::RecoverAccount(op) => op.fee = fee,
        }
    }

    /// Operations whose fee is chosen by the caller rather than the schedule.
    pub fn has_special_fee(&self) -> bool {
        matches!(self, Self::AccountCreate(_))
    }

    /// Length of the free-form payload charged per byte.
    pub fn payload_len(&self) -> usize {
        match self {
            Self::Transfer(op) => op.memo.len(),
            Self::AccountCreate(op) => op.json_metadata.len(),
            Self::AccountUpdate(op) => op.json_metadata.len(),
            Self::RecoverAccount(_) => 0,
        }
    }

    /// Add the authorities this operation needs to `required`.
    pub fn collect_required_authorities(&self, required: &mut RequiredAuthorities) {
        match self {
            Self::Transfer(op) => {
                required.active.insert(op.from.clone());
            }
            Self::AccountCreate(op) => {
                required.active.insert(op.creator.clone());
            }
            Self::AccountUpdate(op) => {
                if op.owner.is_some() {
                    required.owner.insert(op.account.clone());
                } else {
                    required.active.insert(op.account.clone());
                }
            }
            Self::RecoverAccount(op) => {
                required.other.push(op.new_owner_authority.clone());
                required.other.push(op.recent_owner_authority.clone());
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Transfer(_) => "transfer",
            Self::AccountCreate(_) => "account_create",
            Self::AccountUpdate(_) => "account_update",
            Self::RecoverAccount(_) => "recover_account",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_types::PublicKey;

    fn key(b: u8) -> PublicKey {
        let mut bytes = [b; 33];
        bytes[0] = 0x02;
        PublicKey(bytes)
    }

    fn update(owner: Option<Authority>) -> Operation {
        Operation::AccountUpdate(AccountUpdateOp {
            fee: Asset::default(),
            account: "alice".into(),
            owner,
            active: None,
            memo_key: key(1),
            json_metadata: String::new(),
        })
    }

    #[test]
    fn transfer_requires_sender_active() {
        let op = Operation::Transfer(TransferOp {
            fee: Asset::default(),
            from: "alice".into(),
            to: "bob".into(),
            amount: Asset::base(5),
            memo: String::new(),
        });
        let mut req = RequiredAuthorities::default();
        op.collect_required_authorities(&mut req);
        assert!(req.active.contains("alice"));
        assert!(req.owner.is_empty());
        assert!(req.other.is_empty());
    }

    #[test]
    fn owner_change_requires_owner() {
        let mut req = RequiredAuthorities::default();
        update(Some(Authority::from_key(1, key(2), 1))).collect_required_authorities(&mut req);
        assert!(req.owner.contains("alice"));
        assert!(req.active.is_empty());
    }

    #[test]
    fn metadata_change_requires_active() {
        let mut req = RequiredAuthorities::default();
        update(None).collect_required_authorities(&mut req);
        assert!(req.active.contains("alice"));
        assert!(req.owner.is_empty());
    }

    #[test]
    fn recovery_contributes_two_other_authorities() {
        let op = Operation::RecoverAccount(RecoverAccountOp {
            fee: Asset::default(),
            account_to_recover: "alice".into(),
            new_owner_authority: Authority::from_key(1, key(3), 1),
            recent_owner_authority: Authority::from_key(1, key(4), 1),
        });
        let mut req = RequiredAuthorities::default();
        op.collect_required_authorities(&mut req);
        assert_eq!(req.other.len(), 2);
        assert!(req.active.is_empty() && req.owner.is_empty());
    }

    #[test]
    fn only_account_create_has_special_fee() {
        assert!(!update(None).has_special_fee());
        let op = Operation::AccountCreate(AccountCreateOp {
            fee: Asset::base(100),
            creator: "alice".into(),
            name_seed: "bob".into(),
            owner: Authority::from_key(1, key(1), 1),
            active: Authority::from_key(1, key(2), 1),
            memo_key: key(3),
            json_metadata: "{}".into(),
        });
        assert!(op.has_special_fee());
        assert_eq!(op.payload_len(), 2);
    }
}
