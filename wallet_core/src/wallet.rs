//! The wallet facade: one owned context tying together the vault, the
//! authorizer, the memo cipher and the remote node.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tracing::{info, warn};
use warden_crypto::{generate_brain_key, key_to_wif, BrainKeyInfo};
use warden_transactions::{
    AccountCreateOp, AccountUpdateOp, AnnotatedTransaction, Operation, RecoverAccountOp,
    Transaction, TransferOp,
};
use warden_types::{
    AccountName, Asset, Authority, AuthorityType, PrivateKey, PublicKey, Weight,
};
use zeroize::Zeroizing;

use crate::authorizer::TransactionAuthorizer;
use crate::config::WalletConfig;
use crate::derivation::{account_key_triple, key_from_password};
use crate::error::WalletError;
use crate::memo::{self, encrypt_memo, NonceSource, MEMO_MARKER};
use crate::remote::{AccountObject, NodeClient, RemoteNode};
use crate::vault::KeyVault;
use crate::wallet_file::{self, WalletData};

/// A wallet shared between request handlers. Every operation takes the lock,
/// so vault state is only ever touched by one caller at a time.
pub type SharedWallet<N> = Arc<Mutex<Wallet<N>>>;

pub struct Wallet<N> {
    config: WalletConfig,
    node: N,
    vault: KeyVault,
    authorizer: TransactionAuthorizer,
    nonces: NonceSource,
}

impl Wallet<NodeClient> {
    /// A wallet talking JSON-RPC to `config.server_rpc_endpoint`.
    pub fn connect(config: WalletConfig) -> Result<Self, WalletError> {
        let node = NodeClient::new(config.server_rpc_endpoint.clone(), config.rpc_timeout())?;
        Self::new(config, node)
    }
}

impl<N: RemoteNode> Wallet<N> {
    pub fn new(config: WalletConfig, node: N) -> Result<Self, WalletError> {
        config.validate()?;
        let mut authorizer = TransactionAuthorizer::new(config.parsed_chain_id()?);
        authorizer.set_transaction_expiration(config.tx_expiration_seconds)?;
        Ok(Self {
            config,
            node,
            vault: KeyVault::new(),
            authorizer,
            nonces: NonceSource::new(),
        })
    }

    pub fn into_shared(self) -> SharedWallet<N> {
        Arc::new(Mutex::new(self))
    }

    pub fn config(&self) -> &WalletConfig {
        &self.config
    }

    pub fn node(&self) -> &N {
        &self.node
    }

    pub fn vault(&self) -> &KeyVault {
        &self.vault
    }

    // ── Vault lifecycle ─────────────────────────────────────────────────

    pub fn is_new(&self) -> bool {
        self.vault.is_new()
    }

    pub fn is_locked(&self) -> bool {
        self.vault.is_locked()
    }

    pub fn subscribe_lock_changes(&self) -> watch::Receiver<bool> {
        self.vault.subscribe_lock_changes()
    }

    pub fn lock(&mut self) -> Result<(), WalletError> {
        self.vault.lock()
    }

    pub fn unlock(&mut self, password: &str) -> Result<(), WalletError> {
        self.vault.unlock(password)
    }

    pub fn set_password(&mut self, password: &str) -> Result<(), WalletError> {
        self.vault.set_password(password)
    }

    pub fn import_key(&mut self, wif: &str) -> Result<bool, WalletError> {
        self.vault.import_key(wif)
    }

    pub fn list_keys(&self) -> Result<Vec<(PublicKey, Zeroizing<String>)>, WalletError> {
        self.vault.list_keys()
    }

    pub fn export_private_key(&self, public: &PublicKey) -> Result<Zeroizing<String>, WalletError> {
        self.vault.export_private_key(public)
    }

    // ── Derivation ──────────────────────────────────────────────────────

    pub fn suggest_brain_key(&self) -> Result<BrainKeyInfo, WalletError> {
        Ok(generate_brain_key()?)
    }

    /// Public key and WIF of the key `account` would derive for `role` from
    /// `password`.
    pub fn get_private_key_from_password(
        &self,
        account: &str,
        role: &str,
        password: &str,
    ) -> Result<(PublicKey, Zeroizing<String>), WalletError> {
        let pair = key_from_password(account, role, password)?;
        Ok((pair.public, key_to_wif(&pair.private)))
    }

    // ── Authorization ───────────────────────────────────────────────────

    pub fn set_transaction_expiration(&mut self, seconds: u32) -> Result<(), WalletError> {
        self.authorizer.set_transaction_expiration(seconds)
    }

    pub async fn sign_transaction(
        &mut self,
        tx: Transaction,
        broadcast: bool,
    ) -> Result<AnnotatedTransaction, WalletError> {
        self.authorizer
            .sign_transaction(tx, broadcast, &self.vault, &self.node)
            .await
    }

    async fn sign_operation(
        &mut self,
        op: Operation,
        broadcast: bool,
    ) -> Result<AnnotatedTransaction, WalletError> {
        let tx = Transaction::new(vec![op]);
        tx.validate()?;
        self.sign_transaction(tx, broadcast).await
    }

    // ── Accounts ────────────────────────────────────────────────────────

    /// Fetch exactly one account by name.
    pub async fn get_account(&self, name: &str) -> Result<AccountObject, WalletError> {
        let mut accounts = self.node.get_accounts(&[name.to_string()]).await?;
        match (accounts.len(), accounts.pop().flatten()) {
            (1, Some(account)) if account.name == name => Ok(account),
            (1, Some(account)) => Err(WalletError::MissingAccount(format!(
                "asked for {name}, node returned {}",
                account.name
            ))),
            _ => Err(WalletError::MissingAccount(name.to_string())),
        }
    }

    /// Accounts that reference any key held in the vault, sorted by name.
    pub async fn list_my_accounts(&self) -> Result<Vec<AccountObject>, WalletError> {
        if self.vault.is_locked() {
            return Err(WalletError::Locked);
        }
        let keys = self.vault.public_keys();
        let references = self.node.get_key_references(&keys).await?;
        let names: BTreeSet<AccountName> = references.into_iter().flatten().collect();
        if names.is_empty() {
            return Ok(Vec::new());
        }
        let names: Vec<AccountName> = names.into_iter().collect();
        let fetched = self.node.get_accounts(&names).await?;
        let mut accounts = Vec::with_capacity(fetched.len());
        for (name, account) in names.iter().zip(fetched) {
            match account {
                Some(account) => accounts.push(account),
                None => warn!(account = %name, "referenced account not found"),
            }
        }
        Ok(accounts)
    }

    /// Create an account whose keys this wallet controls: `owner` as given,
    /// active and memo keys derived from it. All three are imported before
    /// signing.
    pub async fn create_account_with_private_key(
        &mut self,
        owner: PrivateKey,
        name_seed: &str,
        creator: &str,
        broadcast: bool,
    ) -> Result<AnnotatedTransaction, WalletError> {
        if self.vault.is_locked() {
            return Err(WalletError::Locked);
        }
        let keys = account_key_triple(owner, |key| self.vault.has_key(key))?;
        for pair in [&keys.owner, &keys.active, &keys.memo] {
            self.vault.import_key(&key_to_wif(&pair.private))?;
        }
        info!(account = name_seed, "derived keys for new account");
        self.create_account_with_keys(
            creator,
            name_seed,
            "",
            keys.owner.public,
            keys.active.public,
            keys.memo.public,
            broadcast,
        )
        .await
    }

    /// Create an account for the given public keys, which this wallet may not
    /// hold.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_account_with_keys(
        &mut self,
        creator: &str,
        name_seed: &str,
        json_meta: &str,
        owner: PublicKey,
        active: PublicKey,
        memo: PublicKey,
        broadcast: bool,
    ) -> Result<AnnotatedTransaction, WalletError> {
        if self.vault.is_locked() {
            return Err(WalletError::Locked);
        }
        let schedule = self.node.get_fee_schedule().await?;
        let op = Operation::AccountCreate(AccountCreateOp {
            fee: schedule.creation_fee(),
            creator: creator.to_string(),
            name_seed: name_seed.to_string(),
            owner: Authority::from_key(1, owner, 1),
            active: Authority::from_key(1, active, 1),
            memo_key: memo,
            json_metadata: json_meta.to_string(),
        });
        self.sign_operation(op, broadcast).await
    }

    /// Create an account with three fresh brain keys, imported first.
    pub async fn create_account(
        &mut self,
        creator: &str,
        name_seed: &str,
        json_meta: &str,
        broadcast: bool,
    ) -> Result<AnnotatedTransaction, WalletError> {
        if self.vault.is_locked() {
            return Err(WalletError::Locked);
        }
        let owner = generate_brain_key()?;
        let active = generate_brain_key()?;
        let memo = generate_brain_key()?;
        for info in [&owner, &active, &memo] {
            self.vault.import_key(&info.wif_priv_key)?;
        }
        self.create_account_with_keys(
            creator,
            name_seed,
            json_meta,
            owner.pub_key,
            active.pub_key,
            memo.pub_key,
            broadcast,
        )
        .await
    }

    /// Add, reweigh or (with weight 0) remove a key in one of an account's
    /// authorities.
    pub async fn update_account_auth_key(
        &mut self,
        account: &str,
        kind: AuthorityType,
        key: PublicKey,
        weight: Weight,
        broadcast: bool,
    ) -> Result<AnnotatedTransaction, WalletError> {
        self.update_authority(account, kind, broadcast, |auth| {
            if weight == 0 {
                auth.key_auths.remove(&key);
            } else {
                auth.add_key(key, weight);
            }
        })
        .await
    }

    /// Add, reweigh or (with weight 0) remove a delegated account in one of
    /// an account's authorities.
    pub async fn update_account_auth_account(
        &mut self,
        account: &str,
        kind: AuthorityType,
        auth_account: &str,
        weight: Weight,
        broadcast: bool,
    ) -> Result<AnnotatedTransaction, WalletError> {
        self.update_authority(account, kind, broadcast, |auth| {
            if weight == 0 {
                auth.account_auths.remove(auth_account);
            } else {
                auth.add_account(auth_account, weight);
            }
        })
        .await
    }

    pub async fn update_account_auth_threshold(
        &mut self,
        account: &str,
        kind: AuthorityType,
        threshold: u32,
        broadcast: bool,
    ) -> Result<AnnotatedTransaction, WalletError> {
        if threshold == 0 {
            return Err(WalletError::InvalidArgument(
                "a zero threshold is implicitly satisfied".into(),
            ));
        }
        self.update_authority(account, kind, broadcast, |auth| {
            auth.weight_threshold = threshold;
        })
        .await
    }

    async fn update_authority<F>(
        &mut self,
        account: &str,
        kind: AuthorityType,
        broadcast: bool,
        edit: F,
    ) -> Result<AnnotatedTransaction, WalletError>
    where
        F: FnOnce(&mut Authority),
    {
        if self.vault.is_locked() {
            return Err(WalletError::Locked);
        }
        let current = self.get_account(account).await?;
        let mut authority = match kind {
            AuthorityType::Owner => current.owner.clone(),
            AuthorityType::Active => current.active.clone(),
        };
        edit(&mut authority);

        if authority.is_impossible() {
            if kind == AuthorityType::Owner {
                return Err(WalletError::InvalidArgument(
                    "owner authority change would render the account irrecoverable".into(),
                ));
            }
            warn!(account, authority = %kind, "authority is now impossible");
        }

        let mut op = AccountUpdateOp {
            fee: Asset::default(),
            account: account.to_string(),
            owner: None,
            active: None,
            memo_key: current.memo_key,
            json_metadata: current.json_metadata,
        };
        match kind {
            AuthorityType::Owner => op.owner = Some(authority),
            AuthorityType::Active => op.active = Some(authority),
        }
        self.sign_operation(Operation::AccountUpdate(op), broadcast).await
    }

    pub async fn update_account_memo_key(
        &mut self,
        account: &str,
        key: PublicKey,
        broadcast: bool,
    ) -> Result<AnnotatedTransaction, WalletError> {
        if self.vault.is_locked() {
            return Err(WalletError::Locked);
        }
        let current = self.get_account(account).await?;
        let op = AccountUpdateOp {
            fee: Asset::default(),
            account: account.to_string(),
            owner: None,
            active: None,
            memo_key: key,
            json_metadata: current.json_metadata,
        };
        self.sign_operation(Operation::AccountUpdate(op), broadcast).await
    }

    pub async fn update_account_meta(
        &mut self,
        account: &str,
        json_meta: &str,
        broadcast: bool,
    ) -> Result<AnnotatedTransaction, WalletError> {
        if self.vault.is_locked() {
            return Err(WalletError::Locked);
        }
        let current = self.get_account(account).await?;
        let op = AccountUpdateOp {
            fee: Asset::default(),
            account: account.to_string(),
            owner: None,
            active: None,
            memo_key: current.memo_key,
            json_metadata: json_meta.to_string(),
        };
        self.sign_operation(Operation::AccountUpdate(op), broadcast).await
    }

    /// Install `new_authority` as owner, proven by a recent owner authority.
    pub async fn recover_account(
        &mut self,
        account_to_recover: &str,
        recent_authority: Authority,
        new_authority: Authority,
        broadcast: bool,
    ) -> Result<AnnotatedTransaction, WalletError> {
        if self.vault.is_locked() {
            return Err(WalletError::Locked);
        }
        let op = Operation::RecoverAccount(RecoverAccountOp {
            fee: Asset::default(),
            account_to_recover: account_to_recover.to_string(),
            new_owner_authority: new_authority,
            recent_owner_authority: recent_authority,
        });
        self.sign_operation(op, broadcast).await
    }

    // ── Transfers and memos ─────────────────────────────────────────────

    pub async fn transfer(
        &mut self,
        from: &str,
        to: &str,
        amount: Asset,
        memo: &str,
        broadcast: bool,
    ) -> Result<AnnotatedTransaction, WalletError> {
        if self.vault.is_locked() {
            return Err(WalletError::Locked);
        }
        let sender = self.get_account(from).await?;
        memo::check_memo(memo, &sender, &self.vault)?;
        let memo = self.get_encrypted_memo(from, to, memo).await?;

        let op = Operation::Transfer(TransferOp {
            fee: Asset::default(),
            from: from.to_string(),
            to: to.to_string(),
            amount,
            memo,
        });
        self.sign_operation(op, broadcast).await
    }

    /// Encrypt a `#`-marked memo between the memo keys of `from` and `to`.
    /// Unmarked memos come back unchanged.
    pub async fn get_encrypted_memo(
        &self,
        from: &str,
        to: &str,
        memo: &str,
    ) -> Result<String, WalletError> {
        let Some(text) = memo.strip_prefix(MEMO_MARKER) else {
            return Ok(memo.to_string());
        };
        let sender = self.get_account(from).await?;
        let recipient = self.get_account(to).await?;
        let private = self.vault.get_private_key(&sender.memo_key)?;
        let data = encrypt_memo(&private, &recipient.memo_key, self.nonces.next(), text)?;
        Ok(data.to_string())
    }

    pub fn decrypt_memo(&self, memo: &str) -> String {
        memo::decrypt_memo(memo, &self.vault)
    }

    // ── Wallet file ─────────────────────────────────────────────────────

    fn wallet_path(&self, path: Option<&Path>) -> PathBuf {
        path.map(Path::to_path_buf)
            .unwrap_or_else(|| self.config.wallet_file.clone())
    }

    /// Replace the vault and endpoint with a saved wallet file. Returns
    /// `false` when there is no file.
    pub fn load_wallet_file(&mut self, path: Option<&Path>) -> Result<bool, WalletError> {
        let path = self.wallet_path(path);
        let Some(data) = wallet_file::load_wallet_data(&path)? else {
            return Ok(false);
        };
        self.config.server_rpc_endpoint = data.ws_server;
        self.vault.restore(data.cipher_keys);
        Ok(true)
    }

    /// Re-encrypt the keys and write the wallet file.
    pub fn save_wallet_file(&mut self, path: Option<&Path>) -> Result<(), WalletError> {
        let path = self.wallet_path(path);
        self.vault.encrypt_keys()?;
        let data = WalletData {
            ws_server: self.config.server_rpc_endpoint.clone(),
            cipher_keys: self.vault.cipher_keys().to_vec(),
        };
        wallet_file::save_wallet_data(&data, &path)
    }

    /// Back up the configured wallet file to `dest` without overwriting.
    pub fn copy_wallet_file(&self, dest: &Path) -> Result<PathBuf, WalletError> {
        wallet_file::copy_wallet_file(&self.config.wallet_file, dest)
    }
}
