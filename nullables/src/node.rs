//! Nullable remote node: scripted chain state, recorded broadcasts.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use warden_transactions::{FeeSchedule, Transaction};
use warden_types::{AccountName, BlockId, ChainId, PublicKey};
use warden_wallet_core::{
    AccountObject, BroadcastConfirmation, DynamicGlobalProperties, RemoteNode, WalletError,
};

use crate::clock::NullClock;

/// An in-memory ledger node for tests.
///
/// Accounts, fee schedule and chain id are set up front; the head block
/// advances by one per accepted broadcast.
pub struct NullNode {
    chain_id: ChainId,
    accounts: RefCell<BTreeMap<AccountName, AccountObject>>,
    fee_schedule: RefCell<FeeSchedule>,
    clock: NullClock,
    head_block_number: Cell<u32>,
    broadcasts: RefCell<Vec<Transaction>>,
    chain_id_requests: Cell<usize>,
    account_requests: RefCell<Vec<Vec<AccountName>>>,
    reject_broadcasts: RefCell<Option<String>>,
    short_account_replies: Cell<bool>,
}

impl NullNode {
    pub fn new(chain_id: ChainId) -> Self {
        Self {
            chain_id,
            accounts: RefCell::new(BTreeMap::new()),
            fee_schedule: RefCell::new(FeeSchedule::default()),
            clock: NullClock::default(),
            head_block_number: Cell::new(1000),
            broadcasts: RefCell::new(Vec::new()),
            chain_id_requests: Cell::new(0),
            account_requests: RefCell::new(Vec::new()),
            reject_broadcasts: RefCell::new(None),
            short_account_replies: Cell::new(false),
        }
    }

    pub fn add_account(&self, account: AccountObject) {
        self.accounts
            .borrow_mut()
            .insert(account.name.clone(), account);
    }

    pub fn set_fee_schedule(&self, schedule: FeeSchedule) {
        *self.fee_schedule.borrow_mut() = schedule;
    }

    pub fn clock(&self) -> &NullClock {
        &self.clock
    }

    pub fn set_head_block_number(&self, number: u32) {
        self.head_block_number.set(number);
    }

    /// Fail every broadcast with `detail` until cleared with `None`.
    pub fn reject_broadcasts(&self, detail: Option<&str>) {
        *self.reject_broadcasts.borrow_mut() = detail.map(str::to_string);
    }

    /// Answer `get_accounts` with one entry fewer than requested.
    pub fn short_account_replies(&self, enabled: bool) {
        self.short_account_replies.set(enabled);
    }

    /// Transactions accepted so far (for assertions).
    pub fn broadcasts(&self) -> Vec<Transaction> {
        self.broadcasts.borrow().clone()
    }

    pub fn chain_id_requests(&self) -> usize {
        self.chain_id_requests.get()
    }

    /// The name lists of every `get_accounts` call, in order.
    pub fn account_requests(&self) -> Vec<Vec<AccountName>> {
        self.account_requests.borrow().clone()
    }

    /// Block id whose first four bytes carry `number`.
    pub fn block_id(number: u32) -> BlockId {
        let mut bytes = [0u8; 20];
        bytes[..4].copy_from_slice(&number.to_be_bytes());
        for (i, b) in bytes[4..].iter_mut().enumerate() {
            *b = (i as u8).wrapping_mul(31) ^ (number as u8);
        }
        BlockId::new(bytes)
    }

    fn references(account: &AccountObject, key: &PublicKey) -> bool {
        account.owner.key_auths.contains_key(key)
            || account.active.key_auths.contains_key(key)
            || account.memo_key == *key
    }
}

impl Default for NullNode {
    fn default() -> Self {
        Self::new(ChainId::new([0x42; 32]))
    }
}

impl RemoteNode for NullNode {
    async fn get_accounts(
        &self,
        names: &[AccountName],
    ) -> Result<Vec<Option<AccountObject>>, WalletError> {
        self.account_requests.borrow_mut().push(names.to_vec());
        let accounts = self.accounts.borrow();
        let mut result: Vec<Option<AccountObject>> =
            names.iter().map(|n| accounts.get(n).cloned()).collect();
        if self.short_account_replies.get() {
            result.pop();
        }
        Ok(result)
    }

    async fn get_chain_id(&self) -> Result<ChainId, WalletError> {
        self.chain_id_requests.set(self.chain_id_requests.get() + 1);
        Ok(self.chain_id)
    }

    async fn get_dynamic_global_properties(&self) -> Result<DynamicGlobalProperties, WalletError> {
        let number = self.head_block_number.get();
        Ok(DynamicGlobalProperties {
            head_block_number: number,
            head_block_id: Self::block_id(number),
            time: self.clock.now(),
        })
    }

    async fn get_fee_schedule(&self) -> Result<FeeSchedule, WalletError> {
        Ok(self.fee_schedule.borrow().clone())
    }

    async fn get_key_references(
        &self,
        keys: &[PublicKey],
    ) -> Result<Vec<Vec<AccountName>>, WalletError> {
        let accounts = self.accounts.borrow();
        Ok(keys
            .iter()
            .map(|key| {
                accounts
                    .values()
                    .filter(|a| Self::references(a, key))
                    .map(|a| a.name.clone())
                    .collect()
            })
            .collect())
    }

    async fn broadcast_transaction_synchronous(
        &self,
        tx: &Transaction,
    ) -> Result<BroadcastConfirmation, WalletError> {
        if let Some(detail) = self.reject_broadcasts.borrow().clone() {
            return Err(WalletError::Node(detail));
        }
        let id = tx.id()?;
        let mut broadcasts = self.broadcasts.borrow_mut();
        broadcasts.push(tx.clone());
        let block_num = self.head_block_number.get() + 1;
        self.head_block_number.set(block_num);
        Ok(BroadcastConfirmation {
            id,
            block_num,
            trx_num: (broadcasts.len() - 1) as u32,
        })
    }
}
