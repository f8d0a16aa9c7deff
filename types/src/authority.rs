//! Weighted threshold authorities.
//!
//! An authority is satisfied when the summed weight of the keys that signed,
//! plus the weight of delegated accounts whose own active authority is
//! satisfied, reaches `weight_threshold`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::keys::PublicKey;

/// On-chain account name.
pub type AccountName = String;

/// Weight of a single key or account inside an authority.
pub type Weight = u16;

/// Which of an account's authorities an operation needs or edits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorityType {
    Owner,
    Active,
}

impl AuthorityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Active => "active",
        }
    }
}

impl fmt::Display for AuthorityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authority {
    pub weight_threshold: u32,
    #[serde(default)]
    pub account_auths: BTreeMap<AccountName, Weight>,
    #[serde(default)]
    pub key_auths: BTreeMap<PublicKey, Weight>,
}

impl Authority {
    /// Single-key authority, e.g. `Authority::from_key(1, key, 1)`.
    pub fn from_key(weight_threshold: u32, key: PublicKey, weight: Weight) -> Self {
        let mut auth = Self {
            weight_threshold,
            ..Default::default()
        };
        auth.key_auths.insert(key, weight);
        auth
    }

    pub fn add_key(&mut self, key: PublicKey, weight: Weight) {
        self.key_auths.insert(key, weight);
    }

    pub fn add_account(&mut self, account: impl Into<AccountName>, weight: Weight) {
        self.account_auths.insert(account.into(), weight);
    }

    /// Keys that directly carry weight in this authority, in key order.
    pub fn keys(&self) -> Vec<PublicKey> {
        self.key_auths.keys().copied().collect()
    }

    pub fn num_auths(&self) -> usize {
        self.account_auths.len() + self.key_auths.len()
    }

    /// True when no combination of entries can reach the threshold.
    pub fn is_impossible(&self) -> bool {
        let total: u64 = self
            .account_auths
            .values()
            .chain(self.key_auths.values())
            .map(|w| u64::from(*w))
            .sum();
        total < u64::from(self.weight_threshold)
    }
}
