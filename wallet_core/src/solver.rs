//! Minimal signing-key selection under weighted threshold authorities.
//!
//! The authorizer hands the solver the authorities a transaction needs, the
//! keys the vault can sign with, and lookups for any account's active and
//! owner authority. The solver answers with the smallest set of keys it can
//! find that still satisfies every requirement.

use std::collections::BTreeSet;

use tracing::warn;
use warden_transactions::RequiredAuthorities;
use warden_types::{Authority, PublicKey};

/// Depth to which nested account authorities are followed.
pub const MAX_SIG_CHECK_DEPTH: u32 = 2;

/// Authority lookup by account name. `None` when the account is unknown.
pub type AuthorityLookup<'a> = &'a dyn Fn(&str) -> Option<Authority>;

/// Chooses which available keys sign a transaction.
///
/// Every returned key must be a member of `available`.
pub trait SignatureMinimizer {
    fn minimize(
        &self,
        required: &RequiredAuthorities,
        available: &BTreeSet<PublicKey>,
        get_active: AuthorityLookup<'_>,
        get_owner: AuthorityLookup<'_>,
        max_depth: u32,
    ) -> BTreeSet<PublicKey>;
}

/// Greedy sign-state check followed by one-at-a-time elimination.
///
/// An owner authority may stand in for an active one. When the available
/// keys cannot satisfy the requirements at all, the keys that contributed
/// are still returned and the chain rejects the transaction.
#[derive(Clone, Copy, Debug, Default)]
pub struct AuthorityMinimizer;

impl SignatureMinimizer for AuthorityMinimizer {
    fn minimize(
        &self,
        required: &RequiredAuthorities,
        available: &BTreeSet<PublicKey>,
        get_active: AuthorityLookup<'_>,
        get_owner: AuthorityLookup<'_>,
        max_depth: u32,
    ) -> BTreeSet<PublicKey> {
        let mut state = SignState::new(available, get_active, max_depth);
        if !state.verify(required, get_owner) {
            warn!("available keys cannot satisfy the required authorities");
        }
        let mut result = state.used;

        let candidates: Vec<PublicKey> = result.iter().copied().collect();
        for key in candidates {
            result.remove(&key);
            let mut trial = SignState::new(&result, get_active, max_depth);
            if !trial.verify(required, get_owner) {
                result.insert(key);
            }
        }
        result
    }
}

struct SignState<'a> {
    available: &'a BTreeSet<PublicKey>,
    get_active: AuthorityLookup<'a>,
    max_depth: u32,
    used: BTreeSet<PublicKey>,
}

impl<'a> SignState<'a> {
    fn new(
        available: &'a BTreeSet<PublicKey>,
        get_active: AuthorityLookup<'a>,
        max_depth: u32,
    ) -> Self {
        Self {
            available,
            get_active,
            max_depth,
            used: BTreeSet::new(),
        }
    }

    fn verify(&mut self, required: &RequiredAuthorities, get_owner: AuthorityLookup<'_>) -> bool {
        let mut ok = true;
        for name in &required.active {
            let active = (self.get_active)(name.as_str());
            let satisfied = active.is_some_and(|auth| self.check(&auth, 0))
                || get_owner(name.as_str()).is_some_and(|auth| self.check(&auth, 0));
            ok &= satisfied;
        }
        for name in &required.owner {
            ok &= get_owner(name.as_str()).is_some_and(|auth| self.check(&auth, 0));
        }
        for auth in &required.other {
            ok &= self.check(auth, 0);
        }
        ok
    }

    /// Keys first, in key order, stopping as soon as the threshold is met;
    /// then delegated accounts through their active authority.
    fn check(&mut self, auth: &Authority, depth: u32) -> bool {
        let threshold = u64::from(auth.weight_threshold);
        let mut total = 0u64;
        for (key, weight) in &auth.key_auths {
            if self.available.contains(key) {
                self.used.insert(*key);
                total += u64::from(*weight);
                if total >= threshold {
                    return true;
                }
            }
        }
        if depth < self.max_depth {
            for (account, weight) in &auth.account_auths {
                let nested = (self.get_active)(account.as_str());
                if nested.is_some_and(|a| self.check(&a, depth + 1)) {
                    total += u64::from(*weight);
                    if total >= threshold {
                        return true;
                    }
                }
            }
        }
        total >= threshold
    }
}
