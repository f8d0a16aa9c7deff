//! Integration tests driving the wallet facade against an in-memory node:
//! account fetch → key selection → signing → broadcast, plus memo and vault
//! flows that cross module boundaries.

use std::collections::BTreeSet;

use warden_crypto::{brain_key_info, generate_keypair, key_to_wif, recover_public_key};
use warden_nullables::NullNode;
use warden_transactions::{
    AnnotatedTransaction, FeeSchedule, Operation, Transaction, TransferOp,
};
use warden_types::{Asset, Authority, AuthorityType, ChainId, KeyPair, PublicKey};
use warden_transactions::RequiredAuthorities;
use warden_wallet_core::solver::AuthorityLookup;
use warden_wallet_core::{
    AccountObject, SignatureMinimizer, TransactionAuthorizer, Wallet, WalletConfig, WalletError,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const NODE_CHAIN_ID: [u8; 32] = [0x42; 32];

fn single(key: PublicKey) -> Authority {
    Authority::from_key(1, key, 1)
}

fn account(name: &str, owner: Authority, active: Authority, memo: PublicKey) -> AccountObject {
    AccountObject {
        name: name.into(),
        owner,
        active,
        memo_key: memo,
        json_metadata: String::new(),
    }
}

fn unlocked(node: NullNode) -> Wallet<NullNode> {
    let mut wallet = Wallet::new(WalletConfig::default(), node).expect("wallet");
    wallet.set_password("pw").expect("set password");
    wallet.unlock("pw").expect("unlock");
    wallet
}

fn import(wallet: &mut Wallet<NullNode>, pair: &KeyPair) {
    wallet.import_key(&key_to_wif(&pair.private)).expect("import");
}

fn signers(annotated: &AnnotatedTransaction) -> BTreeSet<PublicKey> {
    let digest = annotated
        .transaction
        .sig_digest(&ChainId::new(NODE_CHAIN_ID))
        .expect("digest");
    annotated
        .transaction
        .signatures
        .iter()
        .map(|sig| recover_public_key(&digest, sig).expect("recoverable"))
        .collect()
}

fn transfer_tx(from: &str, to: &str, memo: &str) -> Transaction {
    Transaction::new(vec![Operation::Transfer(TransferOp {
        fee: Asset::default(),
        from: from.into(),
        to: to.into(),
        amount: Asset::base(5),
        memo: memo.into(),
    })])
}

/// alice: owner = O, active = 1-of-1 A, memo = M. bob: single key B for all.
struct Fixture {
    owner: KeyPair,
    active: KeyPair,
    memo: KeyPair,
    bob: KeyPair,
}

fn fixture(node: &NullNode) -> Fixture {
    let f = Fixture {
        owner: generate_keypair(),
        active: generate_keypair(),
        memo: generate_keypair(),
        bob: generate_keypair(),
    };
    node.add_account(account(
        "alice",
        single(f.owner.public),
        single(f.active.public),
        f.memo.public,
    ));
    node.add_account(account(
        "bob",
        single(f.bob.public),
        single(f.bob.public),
        f.bob.public,
    ));
    f
}

// ---------------------------------------------------------------------------
// 1. Minimal signing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn two_of_three_signs_with_exactly_the_two_held_keys() {
    let node = NullNode::default();
    let keys: Vec<KeyPair> = (0..3).map(|_| generate_keypair()).collect();
    let mut active = Authority {
        weight_threshold: 2,
        ..Default::default()
    };
    for k in &keys {
        active.add_key(k.public, 1);
    }
    node.add_account(account("alice", single(keys[0].public), active, keys[0].public));

    let mut wallet = unlocked(node);
    import(&mut wallet, &keys[0]);
    import(&mut wallet, &keys[1]);
    import(&mut wallet, &generate_keypair());

    let signed = wallet
        .sign_transaction(transfer_tx("alice", "bob", ""), false)
        .await
        .expect("signed");
    assert_eq!(signed.transaction.signatures.len(), 2);
    assert_eq!(
        signers(&signed),
        BTreeSet::from([keys[0].public, keys[1].public])
    );
    assert_eq!(signed.block_num, 0);
    assert_eq!(signed.transaction_id, signed.transaction.id().unwrap());
}

#[tokio::test]
async fn two_of_three_with_all_keys_still_signs_twice() {
    let node = NullNode::default();
    let keys: Vec<KeyPair> = (0..3).map(|_| generate_keypair()).collect();
    let mut active = Authority {
        weight_threshold: 2,
        ..Default::default()
    };
    for k in &keys {
        active.add_key(k.public, 1);
    }
    node.add_account(account("alice", single(keys[0].public), active, keys[0].public));

    let mut wallet = unlocked(node);
    for k in &keys {
        import(&mut wallet, k);
    }
    let signed = wallet
        .sign_transaction(transfer_tx("alice", "bob", ""), false)
        .await
        .unwrap();
    assert_eq!(signed.transaction.signatures.len(), 2);
}

#[tokio::test]
async fn owner_change_is_signed_by_owner_key() {
    let node = NullNode::default();
    let f = fixture(&node);
    let mut wallet = unlocked(node);
    import(&mut wallet, &f.owner);
    import(&mut wallet, &f.active);

    let new_key = generate_keypair().public;
    let signed = wallet
        .update_account_auth_key("alice", AuthorityType::Owner, new_key, 1, false)
        .await
        .unwrap();
    assert_eq!(signers(&signed), BTreeSet::from([f.owner.public]));
    let Operation::AccountUpdate(op) = &signed.transaction.operations[0] else {
        panic!("expected account update");
    };
    let owner = op.owner.as_ref().unwrap();
    assert_eq!(owner.key_auths.len(), 2);
    assert!(op.active.is_none());
}

#[tokio::test]
async fn recovery_signs_both_other_authorities() {
    let node = NullNode::default();
    let recent = generate_keypair();
    let new_owner = generate_keypair();
    let mut wallet = unlocked(node);
    import(&mut wallet, &recent);
    import(&mut wallet, &new_owner);

    let signed = wallet
        .recover_account("alice", single(recent.public), single(new_owner.public), false)
        .await
        .unwrap();
    assert_eq!(
        signers(&signed),
        BTreeSet::from([recent.public, new_owner.public])
    );
}

#[tokio::test]
async fn accounts_named_by_other_authorities_are_fetched() {
    let node = NullNode::default();
    let f = fixture(&node);
    let mut recent = Authority {
        weight_threshold: 1,
        ..Default::default()
    };
    recent.add_account("bob", 1);

    let mut wallet = unlocked(node);
    import(&mut wallet, &f.bob);
    let signed = wallet
        .recover_account("alice", recent, single(f.bob.public), false)
        .await
        .unwrap();
    assert_eq!(signers(&signed), BTreeSet::from([f.bob.public]));
    assert!(wallet
        .node()
        .account_requests()
        .contains(&vec!["bob".to_string()]));
}

// ---------------------------------------------------------------------------
// 2. Account resolution failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn short_account_reply_is_missing_account() {
    let node = NullNode::default();
    let f = fixture(&node);
    node.short_account_replies(true);
    let mut wallet = unlocked(node);
    import(&mut wallet, &f.active);

    let result = wallet
        .sign_transaction(transfer_tx("alice", "bob", ""), false)
        .await;
    assert!(matches!(result, Err(WalletError::MissingAccount(_))));
}

#[tokio::test]
async fn unknown_approving_account_is_skipped() {
    let node = NullNode::default();
    let mut wallet = unlocked(node);
    import(&mut wallet, &generate_keypair());

    let signed = wallet
        .sign_transaction(transfer_tx("ghost", "bob", ""), false)
        .await
        .expect("unknown accounts degrade, not fail");
    assert!(signed.transaction.signatures.is_empty());
}

#[tokio::test]
async fn locked_vault_cannot_sign() {
    let node = NullNode::default();
    let mut wallet = unlocked(node);
    wallet.lock().unwrap();
    let result = wallet
        .sign_transaction(transfer_tx("alice", "bob", ""), false)
        .await;
    assert!(matches!(result, Err(WalletError::Locked)));
}

/// Chooses a key the vault never held.
struct StrayKeyMinimizer(PublicKey);

impl SignatureMinimizer for StrayKeyMinimizer {
    fn minimize(
        &self,
        _required: &RequiredAuthorities,
        _available: &BTreeSet<PublicKey>,
        _get_active: AuthorityLookup<'_>,
        _get_owner: AuthorityLookup<'_>,
        _max_depth: u32,
    ) -> BTreeSet<PublicKey> {
        BTreeSet::from([self.0])
    }
}

#[tokio::test]
async fn minimizer_choosing_unavailable_key_is_key_not_found() {
    let node = NullNode::default();
    let f = fixture(&node);
    let mut wallet = unlocked(node);
    import(&mut wallet, &f.active);

    let stray = generate_keypair().public;
    let mut authorizer =
        TransactionAuthorizer::with_minimizer(None, StrayKeyMinimizer(stray));
    let result = authorizer
        .sign_transaction(
            transfer_tx("alice", "bob", ""),
            true,
            wallet.vault(),
            wallet.node(),
        )
        .await;
    assert!(matches!(
        result,
        Err(WalletError::KeyNotFound(ref detail)) if detail.contains(&stray.to_string())
    ));
    assert!(wallet.node().broadcasts().is_empty());
}

// ---------------------------------------------------------------------------
// 3. Broadcast
// ---------------------------------------------------------------------------

#[tokio::test]
async fn broadcast_annotates_with_block_and_index() {
    let node = NullNode::default();
    let f = fixture(&node);
    node.set_head_block_number(41);
    let mut wallet = unlocked(node);
    import(&mut wallet, &f.active);

    let signed = wallet
        .transfer("alice", "bob", Asset::base(5), "thanks", true)
        .await
        .unwrap();
    assert_eq!(signed.block_num, 42);
    assert_eq!(signed.transaction_num, 0);
    let sent = wallet.node().broadcasts();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0], signed.transaction);
}

#[tokio::test]
async fn rejected_broadcast_carries_node_detail() {
    let node = NullNode::default();
    let f = fixture(&node);
    node.reject_broadcasts(Some("insufficient balance"));
    let mut wallet = unlocked(node);
    import(&mut wallet, &f.active);

    let err = wallet
        .transfer("alice", "bob", Asset::base(5), "", true)
        .await
        .unwrap_err();
    match err {
        WalletError::BroadcastRejected(detail) => assert!(detail.contains("insufficient balance")),
        other => panic!("unexpected error: {other}"),
    }
    assert!(wallet.node().broadcasts().is_empty());
}

// ---------------------------------------------------------------------------
// 4. Chain id, fees, reference block and expiration
// ---------------------------------------------------------------------------

#[tokio::test]
async fn chain_id_fetched_once() {
    let node = NullNode::default();
    let f = fixture(&node);
    let mut wallet = unlocked(node);
    import(&mut wallet, &f.active);

    for _ in 0..3 {
        wallet
            .sign_transaction(transfer_tx("alice", "bob", ""), false)
            .await
            .unwrap();
    }
    assert_eq!(wallet.node().chain_id_requests(), 1);
}

#[tokio::test]
async fn configured_chain_id_is_never_fetched() {
    let node = NullNode::default();
    let f = fixture(&node);
    let config = WalletConfig {
        chain_id: Some(hex_of(&NODE_CHAIN_ID)),
        ..Default::default()
    };
    let mut wallet = Wallet::new(config, node).unwrap();
    wallet.set_password("pw").unwrap();
    wallet.unlock("pw").unwrap();
    import(&mut wallet, &f.active);

    let signed = wallet
        .sign_transaction(transfer_tx("alice", "bob", ""), false)
        .await
        .unwrap();
    assert_eq!(wallet.node().chain_id_requests(), 0);
    assert_eq!(signers(&signed), BTreeSet::from([f.active.public]));
}

fn hex_of(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[tokio::test]
async fn fees_follow_schedule_except_account_creation() {
    let node = NullNode::default();
    let f = fixture(&node);
    node.set_fee_schedule(FeeSchedule {
        operation_fee: 10,
        byte_fee: 1,
        account_creation_fee: 300,
    });
    let mut wallet = unlocked(node);
    import(&mut wallet, &f.active);

    let signed = wallet
        .transfer("alice", "bob", Asset::base(5), "hello", false)
        .await
        .unwrap();
    assert_eq!(signed.transaction.operations[0].fee().amount, 15);

    let signed = wallet
        .create_account_with_keys(
            "alice",
            "carol",
            "{}",
            generate_keypair().public,
            generate_keypair().public,
            generate_keypair().public,
            false,
        )
        .await
        .unwrap();
    assert_eq!(signed.transaction.operations[0].fee().amount, 300);
}

#[tokio::test]
async fn transaction_stamped_from_head_block() {
    let node = NullNode::default();
    let f = fixture(&node);
    node.clock().set(1_000);
    node.set_head_block_number(0x0001_0203);
    let mut wallet = unlocked(node);
    wallet.set_transaction_expiration(90).unwrap();
    import(&mut wallet, &f.active);

    let signed = wallet
        .sign_transaction(transfer_tx("alice", "bob", ""), false)
        .await
        .unwrap();
    assert_eq!(signed.transaction.expiration.as_secs(), 1_090);
    assert_eq!(signed.transaction.ref_block_num, 0x0203);
    assert!(matches!(
        wallet.set_transaction_expiration(3600),
        Err(WalletError::InvalidArgument(_))
    ));
}

// ---------------------------------------------------------------------------
// 5. Memos
// ---------------------------------------------------------------------------

#[tokio::test]
async fn encrypted_memo_readable_by_both_sides_only() {
    let node = NullNode::default();
    let f = fixture(&node);
    let mut alice = unlocked(node);
    import(&mut alice, &f.active);
    import(&mut alice, &f.memo);

    let signed = alice
        .transfer("alice", "bob", Asset::base(5), "#lunch money", false)
        .await
        .unwrap();
    let Operation::Transfer(op) = &signed.transaction.operations[0] else {
        panic!("expected transfer");
    };
    assert!(op.memo.starts_with('#'));
    assert_ne!(op.memo, "#lunch money");
    assert_eq!(alice.decrypt_memo(&op.memo), "lunch money");

    let mut bob = unlocked(NullNode::default());
    import(&mut bob, &f.bob);
    assert_eq!(bob.decrypt_memo(&op.memo), "lunch money");

    let mut eve = unlocked(NullNode::default());
    import(&mut eve, &generate_keypair());
    assert_eq!(eve.decrypt_memo(&op.memo), op.memo);

    bob.lock().unwrap();
    assert_eq!(bob.decrypt_memo(&op.memo), op.memo);
}

#[tokio::test]
async fn encryption_needs_sender_memo_key() {
    let node = NullNode::default();
    let f = fixture(&node);
    let mut wallet = unlocked(node);
    import(&mut wallet, &f.active);

    let result = wallet
        .transfer("alice", "bob", Asset::base(5), "#secret", false)
        .await;
    assert!(matches!(result, Err(WalletError::KeyNotFound(_))));
}

#[tokio::test]
async fn memo_with_active_key_is_refused() {
    let node = NullNode::default();
    let f = fixture(&node);
    let mut wallet = unlocked(node);
    import(&mut wallet, &f.active);

    let memo = format!("my key is {}", *key_to_wif(&f.active.private));
    let result = wallet
        .transfer("alice", "bob", Asset::base(5), &memo, true)
        .await;
    assert!(matches!(result, Err(WalletError::SensitiveDataDetected(_))));
    assert!(wallet.node().broadcasts().is_empty());

    let ok = wallet
        .transfer("alice", "bob", Asset::base(5), "see you at five", false)
        .await
        .unwrap();
    let Operation::Transfer(op) = &ok.transaction.operations[0] else {
        panic!("expected transfer");
    };
    assert_eq!(op.memo, "see you at five");
}

#[tokio::test]
async fn memo_with_password_for_owner_role_is_refused() {
    let node = NullNode::default();
    let owner = warden_wallet_core::key_from_password("dave", "owner", "hunter22").unwrap();
    let active = generate_keypair();
    node.add_account(account(
        "dave",
        single(owner.public),
        single(active.public),
        active.public,
    ));
    node.add_account(account("bob", single(active.public), single(active.public), active.public));
    let mut wallet = unlocked(node);
    import(&mut wallet, &active);

    let result = wallet
        .transfer("dave", "bob", Asset::base(1), "hunter22", false)
        .await;
    assert!(matches!(result, Err(WalletError::SensitiveDataDetected(_))));
}

// ---------------------------------------------------------------------------
// 6. Accounts
// ---------------------------------------------------------------------------

#[tokio::test]
async fn created_account_keys_land_in_vault() {
    let node = NullNode::default();
    let f = fixture(&node);
    node.set_fee_schedule(FeeSchedule {
        account_creation_fee: 50,
        ..Default::default()
    });
    let mut wallet = unlocked(node);
    import(&mut wallet, &f.active);

    let owner = generate_keypair();
    let owner_public = owner.public;
    let signed = wallet
        .create_account_with_private_key(owner.private, "carol", "alice", true)
        .await
        .unwrap();

    let Operation::AccountCreate(op) = &signed.transaction.operations[0] else {
        panic!("expected account create");
    };
    assert_eq!(op.owner, single(owner_public));
    assert_eq!(op.fee.amount, 50);
    let held: BTreeSet<PublicKey> = wallet
        .list_keys()
        .unwrap()
        .into_iter()
        .map(|(k, _)| k)
        .collect();
    assert!(held.contains(&owner_public));
    assert!(op.active.key_auths.keys().all(|k| held.contains(k)));
    assert!(held.contains(&op.memo_key));
    assert_eq!(held.len(), 4);
    assert_eq!(signers(&signed), BTreeSet::from([f.active.public]));
    assert_eq!(wallet.node().broadcasts().len(), 1);
}

#[tokio::test]
async fn create_account_imports_fresh_brain_keys() {
    let node = NullNode::default();
    let f = fixture(&node);
    let mut wallet = unlocked(node);
    import(&mut wallet, &f.active);

    let signed = wallet
        .create_account("alice", "erin", "{}", false)
        .await
        .unwrap();
    let Operation::AccountCreate(op) = &signed.transaction.operations[0] else {
        panic!("expected account create");
    };
    assert!(wallet.vault().has_key(&op.memo_key));
    assert_eq!(wallet.list_keys().unwrap().len(), 4);
}

#[tokio::test]
async fn impossible_owner_refused_impossible_active_allowed() {
    let node = NullNode::default();
    let f = fixture(&node);
    let mut wallet = unlocked(node);
    import(&mut wallet, &f.owner);
    import(&mut wallet, &f.active);

    let owner = wallet
        .update_account_auth_threshold("alice", AuthorityType::Owner, 5, false)
        .await;
    assert!(matches!(owner, Err(WalletError::InvalidArgument(_))));

    let active = wallet
        .update_account_auth_threshold("alice", AuthorityType::Active, 5, false)
        .await
        .unwrap();
    let Operation::AccountUpdate(op) = &active.transaction.operations[0] else {
        panic!("expected account update");
    };
    assert_eq!(op.active.as_ref().unwrap().weight_threshold, 5);
}

#[tokio::test]
async fn zero_weight_removes_delegated_account() {
    let node = NullNode::default();
    let f = fixture(&node);
    let mut wallet = unlocked(node);
    import(&mut wallet, &f.active);

    let added = wallet
        .update_account_auth_account("alice", AuthorityType::Active, "bob", 1, false)
        .await
        .unwrap();
    let Operation::AccountUpdate(op) = &added.transaction.operations[0] else {
        panic!("expected account update");
    };
    assert_eq!(op.active.as_ref().unwrap().account_auths.get("bob"), Some(&1));

    let removed = wallet
        .update_account_auth_account("alice", AuthorityType::Active, "bob", 0, false)
        .await
        .unwrap();
    let Operation::AccountUpdate(op) = &removed.transaction.operations[0] else {
        panic!("expected account update");
    };
    assert!(op.active.as_ref().unwrap().account_auths.is_empty());
}

#[tokio::test]
async fn memo_key_and_metadata_updates() {
    let node = NullNode::default();
    let f = fixture(&node);
    let mut wallet = unlocked(node);
    import(&mut wallet, &f.active);

    let new_memo = generate_keypair().public;
    let signed = wallet
        .update_account_memo_key("alice", new_memo, false)
        .await
        .unwrap();
    let Operation::AccountUpdate(op) = &signed.transaction.operations[0] else {
        panic!("expected account update");
    };
    assert_eq!(op.memo_key, new_memo);

    let signed = wallet
        .update_account_meta("alice", r#"{"about":"hi"}"#, false)
        .await
        .unwrap();
    let Operation::AccountUpdate(op) = &signed.transaction.operations[0] else {
        panic!("expected account update");
    };
    assert_eq!(op.memo_key, f.memo.public);
    assert_eq!(op.json_metadata, r#"{"about":"hi"}"#);

    let missing = wallet.update_account_meta("nobody", "{}", false).await;
    assert!(matches!(missing, Err(WalletError::MissingAccount(_))));
}

#[tokio::test]
async fn my_accounts_found_through_key_references() {
    let node = NullNode::default();
    let f = fixture(&node);
    let mut wallet = unlocked(node);
    import(&mut wallet, &f.memo);
    import(&mut wallet, &f.bob);

    let names: Vec<String> = wallet
        .list_my_accounts()
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.name)
        .collect();
    assert_eq!(names, vec!["alice".to_string(), "bob".to_string()]);

    wallet.lock().unwrap();
    assert!(matches!(
        wallet.list_my_accounts().await,
        Err(WalletError::Locked)
    ));
}

// ---------------------------------------------------------------------------
// 7. Vault scenario and wallet file
// ---------------------------------------------------------------------------

#[tokio::test]
async fn brain_key_vault_scenario() {
    let phrase = "ABC DEF GHI JKL MNO PQR STU VWX YZA BCD EFG HIJ KLM NOP QRS TUV";
    let info = brain_key_info(phrase).unwrap();
    let again = brain_key_info("  abc def ghi jkl mno pqr stu vwx yza bcd efg hij klm nop qrs tuv ").unwrap();
    assert_eq!(info.pub_key, again.pub_key);
    assert_eq!(*info.wif_priv_key, *again.wif_priv_key);

    let mut wallet = Wallet::new(WalletConfig::default(), NullNode::default()).unwrap();
    wallet.set_password("pw1").unwrap();
    wallet.unlock("pw1").unwrap();
    wallet.import_key(&info.wif_priv_key).unwrap();
    wallet.lock().unwrap();

    wallet.unlock("pw1").unwrap();
    let keys = wallet.list_keys().unwrap();
    assert_eq!(keys.len(), 1);
    assert_eq!(keys[0].0, info.pub_key);
    assert_eq!(*keys[0].1, *info.wif_priv_key);

    wallet.lock().unwrap();
    assert!(matches!(
        wallet.unlock("pw2"),
        Err(WalletError::Authentication(_))
    ));
    assert!(wallet.is_locked());
}

#[tokio::test]
async fn shared_wallet_serialises_access() {
    let node = NullNode::default();
    let f = fixture(&node);
    let shared = unlocked(node).into_shared();
    {
        let mut wallet = shared.lock().await;
        import(&mut wallet, &f.active);
    }
    let signed = shared
        .lock()
        .await
        .transfer("alice", "bob", Asset::base(1), "", false)
        .await
        .unwrap();
    assert_eq!(signed.transaction.signatures.len(), 1);
}

#[test]
fn wallet_file_round_trip_and_backup() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wallet.json");
    let config = WalletConfig {
        wallet_file: path.clone(),
        server_rpc_endpoint: "http://node.example:9191".into(),
        ..Default::default()
    };
    let kp = generate_keypair();

    let mut wallet = Wallet::new(config, NullNode::default()).unwrap();
    wallet.set_password("pw").unwrap();
    wallet.unlock("pw").unwrap();
    wallet.import_key(&key_to_wif(&kp.private)).unwrap();
    wallet.save_wallet_file(None).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("http://node.example:9191"));
    assert!(!text.contains(key_to_wif(&kp.private).as_str()));

    let backup = dir.path().join("backup.json");
    assert_eq!(wallet.copy_wallet_file(&backup).unwrap(), backup);
    assert_eq!(
        wallet.copy_wallet_file(&backup).unwrap(),
        dir.path().join("backup-1.json")
    );

    let mut restored = Wallet::new(WalletConfig::default(), NullNode::default()).unwrap();
    assert!(restored.load_wallet_file(Some(&backup)).unwrap());
    assert_eq!(restored.config().server_rpc_endpoint, "http://node.example:9191");
    restored.unlock("pw").unwrap();
    assert!(restored.vault().has_key(&kp.public));
}
