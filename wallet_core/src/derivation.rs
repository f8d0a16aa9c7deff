//! Deterministic key sequences and the owner → active → memo hierarchy.
//!
//! A key sequence is `derive_private_key(wif(parent), i)` for `i = 0, 1, ...`.
//! Account creation walks the sequence to the first index whose key the
//! wallet does not hold yet, tolerating short runs of unused keys left behind
//! by earlier registrations that failed partway.

use warden_crypto::{derive_private_key, key_to_wif, keypair_from_private, private_from_seed_string};
use warden_types::{KeyPair, PrivateKey, PublicKey};
use zeroize::Zeroizing;

use crate::error::WalletError;

/// How many further unused indices must follow an unused index before the
/// scan accepts it as the first gap. A tuning value, not a protocol rule.
pub const UNUSED_KEY_LOOKAHEAD: u32 = 5;

/// Role names mixed into password-derived keys.
pub const KEY_ROLES: [&str; 3] = ["owner", "active", "memo"];

/// The three keys that control a wallet-created account.
pub struct AccountKeys {
    pub owner: KeyPair,
    pub active: KeyPair,
    pub memo: KeyPair,
}

/// Derive the `index`-th key of `parent`'s sequence.
pub fn derive_child(parent: &PrivateKey, index: u32) -> Result<PrivateKey, WalletError> {
    let parent_wif = key_to_wif(parent);
    Ok(derive_private_key(&parent_wif, index)?)
}

/// First index of `parent`'s sequence that starts a run of
/// `UNUSED_KEY_LOOKAHEAD + 1` keys for which `key_exists` is false.
pub fn find_first_unused_index<F>(parent: &PrivateKey, key_exists: F) -> Result<u32, WalletError>
where
    F: Fn(&PublicKey) -> bool,
{
    let parent_wif = key_to_wif(parent);
    let mut first_unused = 0u32;
    let mut run = 0u32;
    let mut index = 0u32;
    loop {
        let child = derive_private_key(&parent_wif, index)?;
        let public = warden_crypto::public_from_private(&child)?;
        if key_exists(&public) {
            run = 0;
        } else {
            if run == 0 {
                first_unused = index;
            }
            run += 1;
            if run > UNUSED_KEY_LOOKAHEAD {
                return Ok(first_unused);
            }
        }
        index = index.checked_add(1).ok_or_else(|| {
            WalletError::InvalidState("key sequence exhausted without a free index".into())
        })?;
    }
}

/// Next unused key of `parent`'s sequence.
pub fn derive_next_unused<F>(parent: &PrivateKey, key_exists: F) -> Result<PrivateKey, WalletError>
where
    F: Fn(&PublicKey) -> bool,
{
    let index = find_first_unused_index(parent, &key_exists)?;
    derive_child(parent, index)
}

/// Owner key as given, active key from the owner's sequence, memo key from the
/// active key's sequence, each at its first unused index.
pub fn account_key_triple<F>(owner: PrivateKey, key_exists: F) -> Result<AccountKeys, WalletError>
where
    F: Fn(&PublicKey) -> bool,
{
    let active = derive_next_unused(&owner, &key_exists)?;
    let memo = derive_next_unused(&active, &key_exists)?;
    Ok(AccountKeys {
        owner: keypair_from_private(owner)?,
        active: keypair_from_private(active)?,
        memo: keypair_from_private(memo)?,
    })
}

/// Key for `account` and `role` derived from a password:
/// `secret = SHA256(account ‖ role ‖ password)`.
pub fn key_from_password(account: &str, role: &str, password: &str) -> Result<KeyPair, WalletError> {
    let seed = Zeroizing::new(format!("{account}{role}{password}"));
    if seed.is_empty() {
        return Err(WalletError::InvalidArgument("seed must not be empty".into()));
    }
    Ok(keypair_from_private(private_from_seed_string(&seed)?)?)
}
