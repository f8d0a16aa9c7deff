//! Turns an unsigned transaction into a minimally signed one.
//!
//! The authorizer owns the per-wallet signing context (cached chain id,
//! expiration window, signature minimizer). Key material comes from the
//! [`KeyVault`] passed to each call; authority data and chain state come from
//! the [`RemoteNode`].

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, error, info, warn};
use warden_crypto::{sign_digest, wif_to_key};
use warden_transactions::{AnnotatedTransaction, Transaction};
use warden_types::{AccountName, Authority, ChainId, PrivateKey, PublicKey};
use warden_utils::describe_expiration;

use crate::config::MAX_TIME_UNTIL_EXPIRATION;
use crate::error::WalletError;
use crate::remote::{AccountObject, RemoteNode};
use crate::solver::{AuthorityMinimizer, SignatureMinimizer, MAX_SIG_CHECK_DEPTH};
use crate::vault::KeyVault;

pub const DEFAULT_TX_EXPIRATION_SECS: u32 = 30;

pub struct TransactionAuthorizer<M = AuthorityMinimizer> {
    /// Zero until resolved.
    chain_id: ChainId,
    expiration_secs: u32,
    minimizer: M,
}

impl TransactionAuthorizer<AuthorityMinimizer> {
    pub fn new(chain_id: Option<ChainId>) -> Self {
        Self::with_minimizer(chain_id, AuthorityMinimizer)
    }
}

impl Default for TransactionAuthorizer<AuthorityMinimizer> {
    fn default() -> Self {
        Self::new(None)
    }
}

impl<M: SignatureMinimizer> TransactionAuthorizer<M> {
    pub fn with_minimizer(chain_id: Option<ChainId>, minimizer: M) -> Self {
        Self {
            chain_id: chain_id.unwrap_or_default(),
            expiration_secs: DEFAULT_TX_EXPIRATION_SECS,
            minimizer,
        }
    }

    /// The cached chain id, if it has been configured or fetched.
    pub fn chain_id(&self) -> Option<ChainId> {
        (!self.chain_id.is_zero()).then_some(self.chain_id)
    }

    pub fn transaction_expiration(&self) -> u32 {
        self.expiration_secs
    }

    pub fn set_transaction_expiration(&mut self, seconds: u32) -> Result<(), WalletError> {
        if seconds >= MAX_TIME_UNTIL_EXPIRATION {
            return Err(WalletError::InvalidArgument(format!(
                "expiration window must be below {MAX_TIME_UNTIL_EXPIRATION} seconds, got {seconds}"
            )));
        }
        self.expiration_secs = seconds;
        Ok(())
    }

    async fn resolve_chain_id<N: RemoteNode>(&mut self, node: &N) -> Result<ChainId, WalletError> {
        if self.chain_id.is_zero() {
            self.chain_id = node.get_chain_id().await?;
            debug!(chain_id = %self.chain_id, "chain id resolved");
        }
        Ok(self.chain_id)
    }

    /// Assign fees, collect the keys the vault can contribute, pick the
    /// minimal subset, sign, and optionally broadcast.
    ///
    /// Without broadcast the returned annotation has block and transaction
    /// numbers of zero.
    pub async fn sign_transaction<N: RemoteNode>(
        &mut self,
        mut tx: Transaction,
        broadcast: bool,
        vault: &KeyVault,
        node: &N,
    ) -> Result<AnnotatedTransaction, WalletError> {
        if vault.is_locked() {
            return Err(WalletError::Locked);
        }
        tx.validate()?;

        let schedule = node.get_fee_schedule().await?;
        let assigned = schedule.assign_fees(&mut tx);
        debug!(assigned, "fees assigned");

        let chain_id = self.resolve_chain_id(node).await?;

        let mut required = tx.required_authorities();
        for auth in &required.other {
            required.active.extend(auth.account_auths.keys().cloned());
        }

        let names: Vec<AccountName> = required
            .active
            .union(&required.owner)
            .cloned()
            .collect();
        let fetched = node.get_accounts(&names).await?;
        if fetched.len() != names.len() {
            return Err(WalletError::MissingAccount(format!(
                "requested {} accounts, node returned {}",
                names.len(),
                fetched.len()
            )));
        }
        let mut accounts: BTreeMap<AccountName, AccountObject> = BTreeMap::new();
        for (name, account) in names.iter().zip(fetched) {
            match account {
                Some(account) => {
                    accounts.insert(account.name.clone(), account);
                }
                None => warn!(account = %name, "approval required from unknown account"),
            }
        }

        let mut approving_keys: BTreeSet<PublicKey> = BTreeSet::new();
        for name in &required.active {
            if let Some(account) = accounts.get(name) {
                approving_keys.extend(account.active.key_auths.keys().copied());
            }
        }
        for name in &required.owner {
            if let Some(account) = accounts.get(name) {
                approving_keys.extend(account.owner.key_auths.keys().copied());
            }
        }
        for auth in &required.other {
            approving_keys.extend(auth.key_auths.keys().copied());
        }

        let mut available_keys = BTreeSet::new();
        let mut private_keys: BTreeMap<PublicKey, PrivateKey> = BTreeMap::new();
        for key in &approving_keys {
            debug!(%key, "approving key");
            let Some(wif) = vault.stored_wif(key) else {
                continue;
            };
            let private = wif_to_key(wif)
                .map_err(|_| WalletError::MalformedVaultEntry(key.to_string()))?;
            available_keys.insert(*key);
            private_keys.insert(*key, private);
        }

        let props = node.get_dynamic_global_properties().await?;
        tx.set_reference_block(&props.head_block_id);
        let expiration = props.time.plus_secs(self.expiration_secs);
        tx.set_expiration(expiration);
        tx.signatures.clear();
        debug!(
            head_block = props.head_block_number,
            expires = %describe_expiration(expiration, props.time),
            "transaction stamped"
        );

        let get_active = |name: &str| -> Option<Authority> {
            accounts.get(name).map(|a| a.active.clone())
        };
        let get_owner = |name: &str| -> Option<Authority> {
            accounts.get(name).map(|a| a.owner.clone())
        };
        let signing_keys = self.minimizer.minimize(
            &required,
            &available_keys,
            &get_active,
            &get_owner,
            MAX_SIG_CHECK_DEPTH,
        );

        let digest = tx.sig_digest(&chain_id)?;
        for key in &signing_keys {
            let private = private_keys.get(key).ok_or_else(|| {
                WalletError::KeyNotFound(format!("minimizer chose unavailable key {key}"))
            })?;
            tx.signatures.push(sign_digest(&digest, private)?);
        }

        let transaction_id = tx.id()?;
        if !broadcast {
            return Ok(AnnotatedTransaction {
                transaction: tx,
                transaction_id,
                block_num: 0,
                transaction_num: 0,
            });
        }

        info!(id = %transaction_id, signatures = tx.signatures.len(), "broadcasting transaction");
        let confirmation = match node.broadcast_transaction_synchronous(&tx).await {
            Ok(confirmation) => confirmation,
            Err(e) => {
                let detail = match e {
                    WalletError::Node(detail) => detail,
                    other => other.to_string(),
                };
                error!(id = %transaction_id, %detail, "broadcast failed");
                return Err(WalletError::BroadcastRejected(detail));
            }
        };
        Ok(AnnotatedTransaction {
            transaction: tx,
            transaction_id,
            block_num: confirmation.block_num,
            transaction_num: confirmation.trx_num,
        })
    }
}
