//! Password-protected store of private keys.
//!
//! While unlocked the vault holds a map from public key to exportable (WIF)
//! private key string plus the password checksum. While locked only the
//! encrypted blob remains:
//!
//! 1. `checksum = SHA-512(password)`
//! 2. `plaintext = bincode({keys, checksum})`
//! 3. `cipher_keys = nonce ‖ AES-256-GCM(checksum[0..32], nonce, plaintext)`
//!
//! Unlocking compares the checksum recovered from the blob with the one
//! computed from the supplied password, so a wrong password fails even if the
//! ciphertext happens to decode.

use std::collections::BTreeMap;

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info};
use warden_crypto::{public_from_private, sha512, wif_to_key};
use warden_types::{Checksum, PrivateKey, PublicKey};
use zeroize::Zeroizing;

use crate::error::WalletError;

/// AES-GCM nonce length in bytes (96 bits).
const NONCE_LEN: usize = 12;

/// Cleartext content of the encrypted blob.
#[derive(Serialize, Deserialize)]
struct PlainKeys {
    keys: BTreeMap<PublicKey, Zeroizing<String>>,
    checksum: Checksum,
}

pub struct KeyVault {
    keys: BTreeMap<PublicKey, Zeroizing<String>>,
    checksum: Checksum,
    cipher_keys: Vec<u8>,
    lock_state: watch::Sender<bool>,
}

impl KeyVault {
    /// A vault that has never had a password. It starts locked.
    pub fn new() -> Self {
        Self::from_cipher_keys(Vec::new())
    }

    /// A locked vault restored from a persisted blob.
    pub fn from_cipher_keys(cipher_keys: Vec<u8>) -> Self {
        let (lock_state, _) = watch::channel(true);
        Self {
            keys: BTreeMap::new(),
            checksum: Checksum::zero(),
            cipher_keys,
            lock_state,
        }
    }

    /// Replace all state with a persisted blob and lock.
    pub fn restore(&mut self, cipher_keys: Vec<u8>) {
        self.keys.clear();
        self.checksum = Checksum::zero();
        self.cipher_keys = cipher_keys;
        self.lock_state.send_replace(true);
    }

    /// No password has been set yet.
    pub fn is_new(&self) -> bool {
        self.cipher_keys.is_empty()
    }

    pub fn is_locked(&self) -> bool {
        self.checksum.is_zero()
    }

    /// Receiver that observes `true` on lock and `false` on unlock.
    pub fn subscribe_lock_changes(&self) -> watch::Receiver<bool> {
        self.lock_state.subscribe()
    }

    pub fn cipher_keys(&self) -> &[u8] {
        &self.cipher_keys
    }

    /// Replace the stored password. Only a new or unlocked vault accepts a
    /// password; the vault is locked under the new password afterwards.
    pub fn set_password(&mut self, password: &str) -> Result<(), WalletError> {
        if password.is_empty() {
            return Err(WalletError::InvalidArgument("password must not be empty".into()));
        }
        if !self.is_new() && self.is_locked() {
            return Err(WalletError::InvalidState(
                "the wallet must be unlocked before the password can be set".into(),
            ));
        }
        self.checksum = password_checksum(password);
        info!("vault password changed");
        self.lock()
    }

    /// Re-encrypt the keys and drop every cleartext copy.
    pub fn lock(&mut self) -> Result<(), WalletError> {
        if self.is_locked() {
            return Err(WalletError::InvalidState("the wallet is already locked".into()));
        }
        self.encrypt_keys()?;
        // Each Zeroizing value and the checksum wipe themselves when dropped.
        self.keys.clear();
        self.checksum = Checksum::zero();
        info!("vault locked");
        self.lock_state.send_replace(true);
        Ok(())
    }

    /// Decrypt the blob with `password` and load its keys.
    pub fn unlock(&mut self, password: &str) -> Result<(), WalletError> {
        if password.is_empty() {
            return Err(WalletError::Authentication("password must not be empty".into()));
        }
        let pw = password_checksum(password);
        let plain = open(&self.cipher_keys, &pw)?;
        if plain.checksum != pw {
            return Err(WalletError::Authentication("invalid password".into()));
        }
        self.keys = plain.keys;
        self.checksum = pw;
        info!(keys = self.keys.len(), "vault unlocked");
        self.lock_state.send_replace(false);
        Ok(())
    }

    /// Refresh the blob from the current keys without locking. No-op while
    /// locked, since the blob is then already authoritative.
    pub fn encrypt_keys(&mut self) -> Result<(), WalletError> {
        if self.is_locked() {
            return Ok(());
        }
        let plain = PlainKeys {
            keys: self.keys.clone(),
            checksum: self.checksum.clone(),
        };
        self.cipher_keys = seal(&plain, &self.checksum)?;
        debug!(keys = self.keys.len(), "vault re-encrypted");
        Ok(())
    }

    /// Add a WIF private key. Returns whether the key was already present.
    pub fn import_key(&mut self, wif: &str) -> Result<bool, WalletError> {
        self.ensure_unlocked()?;
        let private = wif_to_key(wif).map_err(|e| WalletError::InvalidKey(e.to_string()))?;
        let public = public_from_private(&private)?;
        let existed = self
            .keys
            .insert(public, Zeroizing::new(wif.trim().to_string()))
            .is_some();
        debug!(key = %public, existed, "key imported");
        Ok(existed)
    }

    pub fn has_key(&self, public: &PublicKey) -> bool {
        self.keys.contains_key(public)
    }

    pub fn get_private_key(&self, public: &PublicKey) -> Result<PrivateKey, WalletError> {
        let wif = self.export_private_key(public)?;
        wif_to_key(&wif).map_err(|_| WalletError::MalformedVaultEntry(public.to_string()))
    }

    /// The stored WIF string for `public`.
    pub fn export_private_key(&self, public: &PublicKey) -> Result<Zeroizing<String>, WalletError> {
        self.ensure_unlocked()?;
        self.keys
            .get(public)
            .cloned()
            .ok_or_else(|| WalletError::KeyNotFound(public.to_string()))
    }

    /// Borrow the stored WIF string without copying it. `None` while locked.
    pub(crate) fn stored_wif(&self, public: &PublicKey) -> Option<&str> {
        self.keys.get(public).map(|wif| wif.as_str())
    }

    #[cfg(test)]
    pub(crate) fn insert_raw_entry(&mut self, public: PublicKey, wif: &str) {
        self.keys.insert(public, Zeroizing::new(wif.to_string()));
    }

    /// Every key pair, in public key order.
    pub fn list_keys(&self) -> Result<Vec<(PublicKey, Zeroizing<String>)>, WalletError> {
        self.ensure_unlocked()?;
        Ok(self.keys.iter().map(|(k, v)| (*k, v.clone())).collect())
    }

    /// Public keys currently held. Empty while locked.
    pub fn public_keys(&self) -> Vec<PublicKey> {
        self.keys.keys().copied().collect()
    }

    fn ensure_unlocked(&self) -> Result<(), WalletError> {
        if self.is_locked() {
            return Err(WalletError::Locked);
        }
        Ok(())
    }
}

impl Default for KeyVault {
    fn default() -> Self {
        Self::new()
    }
}

fn password_checksum(password: &str) -> Checksum {
    Checksum::new(sha512(password.as_bytes()))
}

fn seal(plain: &PlainKeys, checksum: &Checksum) -> Result<Vec<u8>, WalletError> {
    let bytes = Zeroizing::new(
        bincode::serialize(plain)
            .map_err(|e| WalletError::Serialization(format!("vault encoding failed: {e}")))?,
    );
    let cipher = Aes256Gcm::new_from_slice(&checksum.as_bytes()[..32])
        .map_err(|e| WalletError::Serialization(format!("AES key init failed: {e}")))?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce_bytes);
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), bytes.as_slice())
        .map_err(|e| WalletError::Serialization(format!("vault encryption failed: {e}")))?;

    let mut blob = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    blob.extend_from_slice(&nonce_bytes);
    blob.extend_from_slice(&ciphertext);
    Ok(blob)
}

fn open(blob: &[u8], checksum: &Checksum) -> Result<PlainKeys, WalletError> {
    if blob.len() <= NONCE_LEN {
        return Err(WalletError::Authentication("no encrypted keys to unlock".into()));
    }
    let (nonce_bytes, ciphertext) = blob.split_at(NONCE_LEN);
    let cipher = Aes256Gcm::new_from_slice(&checksum.as_bytes()[..32])
        .map_err(|e| WalletError::Serialization(format!("AES key init failed: {e}")))?;
    let plaintext = Zeroizing::new(
        cipher
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|_| WalletError::Authentication("invalid password".into()))?,
    );
    bincode::deserialize(&plaintext)
        .map_err(|_| WalletError::Authentication("invalid password".into()))
}
