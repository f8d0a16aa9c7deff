//! End-to-end encrypted memos and the sensitive-data memo guard.
//!
//! A memo whose text starts with `#` is encrypted between the sender's and
//! the recipient's memo keys:
//!
//! - `shared = ECDH(sender_priv, recipient_pub)` (symmetric for either side)
//! - `key = SHA-512(nonce_le ‖ shared)`
//! - `check = u32_le(SHA-256(key)[0..4])`
//! - `encrypted = AES-256-CBC(key, varint(len) ‖ text)`
//!
//! and serialized as `#` + base58(from ‖ to ‖ nonce ‖ check ‖ varint(len) ‖
//! encrypted). Memos without the marker travel as plain text.
//!
//! Lengths are LEB128 varints as in the established memo wire format, so the
//! envelope is written by hand rather than through bincode.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;
use warden_crypto::{
    aes_decrypt, aes_encrypt, parse_extended_private_key, public_from_private, sha256,
    sha512_multi, shared_secret, wif_to_key,
};
use warden_types::{PrivateKey, PublicKey};
use zeroize::Zeroizing;

use crate::derivation::{key_from_password, KEY_ROLES};
use crate::error::WalletError;
use crate::remote::AccountObject;
use crate::vault::KeyVault;

/// Leading character that marks a memo for encryption, and an envelope.
pub const MEMO_MARKER: char = '#';

/// A parsed encrypted memo envelope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemoData {
    pub from: PublicKey,
    pub to: PublicKey,
    pub nonce: u64,
    pub check: u32,
    pub encrypted: Vec<u8>,
}

impl fmt::Display for MemoData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut data = Vec::with_capacity(33 + 33 + 8 + 4 + 5 + self.encrypted.len());
        data.extend_from_slice(self.from.as_bytes());
        data.extend_from_slice(self.to.as_bytes());
        data.extend_from_slice(&self.nonce.to_le_bytes());
        data.extend_from_slice(&self.check.to_le_bytes());
        write_varint(&mut data, self.encrypted.len() as u64);
        data.extend_from_slice(&self.encrypted);
        write!(f, "{}{}", MEMO_MARKER, bs58::encode(data).into_string())
    }
}

impl FromStr for MemoData {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = |what: &str| WalletError::Serialization(format!("memo envelope: {what}"));
        let encoded = s
            .strip_prefix(MEMO_MARKER)
            .ok_or_else(|| malformed("missing marker"))?;
        let data = bs58::decode(encoded)
            .into_vec()
            .map_err(|_| malformed("not base58"))?;
        let mut reader = Reader::new(&data);
        let from = PublicKey::from_slice(reader.take(33).ok_or_else(|| malformed("truncated"))?)
            .map_err(|_| malformed("bad sender key"))?;
        let to = PublicKey::from_slice(reader.take(33).ok_or_else(|| malformed("truncated"))?)
            .map_err(|_| malformed("bad recipient key"))?;
        let nonce = reader.u64_le().ok_or_else(|| malformed("truncated"))?;
        let check = reader.u32_le().ok_or_else(|| malformed("truncated"))?;
        let len = reader.varint().ok_or_else(|| malformed("bad length"))?;
        let encrypted = reader
            .take(usize::try_from(len).map_err(|_| malformed("bad length"))?)
            .ok_or_else(|| malformed("truncated"))?
            .to_vec();
        if !reader.is_empty() {
            return Err(malformed("trailing bytes"));
        }
        Ok(Self {
            from,
            to,
            nonce,
            check,
            encrypted,
        })
    }
}

/// Strictly increasing memo nonces derived from the clock in microseconds.
#[derive(Debug, Default)]
pub struct NonceSource {
    last: AtomicU64,
}

impl NonceSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_micros()).unwrap_or(u64::MAX))
            .unwrap_or(0);
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let next = now.max(prev.saturating_add(1));
            match self
                .last
                .compare_exchange_weak(prev, next, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return next,
                Err(actual) => prev = actual,
            }
        }
    }
}

fn symmetric_key(nonce: u64, shared: &[u8; 64]) -> Zeroizing<[u8; 64]> {
    Zeroizing::new(sha512_multi(&[&nonce.to_le_bytes(), shared]))
}

fn check_value(key: &[u8; 64]) -> u32 {
    let digest = sha256(key);
    u32::from_le_bytes([digest[0], digest[1], digest[2], digest[3]])
}

/// Encrypt `text` (without its marker) from `from_private` to `to`.
pub fn encrypt_memo(
    from_private: &PrivateKey,
    to: &PublicKey,
    nonce: u64,
    text: &str,
) -> Result<MemoData, WalletError> {
    let from = public_from_private(from_private)?;
    let shared = Zeroizing::new(shared_secret(from_private, to)?);
    let key = symmetric_key(nonce, &shared);

    let mut plain = Zeroizing::new(Vec::with_capacity(text.len() + 5));
    write_varint(&mut plain, text.len() as u64);
    plain.extend_from_slice(text.as_bytes());

    Ok(MemoData {
        from,
        to: *to,
        nonce,
        check: check_value(&key),
        encrypted: aes_encrypt(&key, &plain)?,
    })
}

/// Recover the text of `memo` with the private key of one side and the
/// public key of the other. `None` when the key does not fit or the payload
/// does not decode.
pub fn decrypt_memo_data(
    memo: &MemoData,
    private: &PrivateKey,
    counterparty: &PublicKey,
) -> Option<String> {
    let shared = Zeroizing::new(shared_secret(private, counterparty).ok()?);
    let key = symmetric_key(memo.nonce, &shared);
    if check_value(&key) != memo.check {
        debug!("memo check mismatch");
        return None;
    }
    let plain = Zeroizing::new(aes_decrypt(&key, &memo.encrypted).ok()?);
    let mut reader = Reader::new(&plain);
    let len = usize::try_from(reader.varint()?).ok()?;
    let text = reader.take(len)?;
    String::from_utf8(text.to_vec()).ok()
}

/// Decrypt `memo` with whichever side's key the vault holds. Anything that
/// cannot be decrypted is returned unchanged.
pub fn decrypt_memo(memo: &str, vault: &KeyVault) -> String {
    if vault.is_locked() {
        return memo.to_string();
    }
    let Ok(data) = memo.parse::<MemoData>() else {
        return memo.to_string();
    };
    let (private, counterparty) = if vault.has_key(&data.from) {
        (vault.get_private_key(&data.from), data.to)
    } else if vault.has_key(&data.to) {
        (vault.get_private_key(&data.to), data.from)
    } else {
        return memo.to_string();
    };
    let Ok(private) = private else {
        return memo.to_string();
    };
    decrypt_memo_data(&data, &private, &counterparty).unwrap_or_else(|| memo.to_string())
}

/// Refuse a memo that reveals a private key of `account` or of the vault.
///
/// Every whitespace-separated token, and the whole memo, is tried as an
/// exportable private key, an extended private key, and as the password of
/// `account` for each key role.
pub fn check_memo(memo: &str, account: &AccountObject, vault: &KeyVault) -> Result<(), WalletError> {
    let candidates = candidate_keys(memo, &account.name);
    for key in &candidates {
        if account.owner.key_auths.contains_key(key) {
            return Err(WalletError::SensitiveDataDetected(
                "private owner key found in memo, transaction cancelled".into(),
            ));
        }
        if account.active.key_auths.contains_key(key) {
            return Err(WalletError::SensitiveDataDetected(
                "private active key found in memo, transaction cancelled".into(),
            ));
        }
        if account.memo_key == *key {
            return Err(WalletError::SensitiveDataDetected(
                "private memo key found in memo, transaction cancelled".into(),
            ));
        }
        if vault.has_key(key) {
            return Err(WalletError::SensitiveDataDetected(
                "imported private key found in memo, transaction cancelled".into(),
            ));
        }
    }
    Ok(())
}

fn candidate_keys(memo: &str, account: &str) -> Vec<PublicKey> {
    let whole = memo.trim();
    let mut secrets: Vec<&str> = vec![whole];
    for token in whole.split_whitespace() {
        let token = token.trim_start_matches(MEMO_MARKER);
        if !token.is_empty() && !secrets.contains(&token) {
            secrets.push(token);
        }
    }

    let mut keys = Vec::new();
    for secret in secrets {
        if let Ok(private) = wif_to_key(secret) {
            keys.extend(public_from_private(&private).ok());
        }
        if let Ok(private) = parse_extended_private_key(secret) {
            keys.extend(public_from_private(&private).ok());
        }
        for role in KEY_ROLES {
            if let Ok(pair) = key_from_password(account, role, secret) {
                keys.push(pair.public);
            }
        }
    }
    keys
}

fn write_varint(out: &mut Vec<u8>, mut value: u64) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}

struct Reader<'a> {
    data: &'a [u8],
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    fn take(&mut self, n: usize) -> Option<&'a [u8]> {
        if self.data.len() < n {
            return None;
        }
        let (head, tail) = self.data.split_at(n);
        self.data = tail;
        Some(head)
    }

    fn u64_le(&mut self) -> Option<u64> {
        Some(u64::from_le_bytes(self.take(8)?.try_into().ok()?))
    }

    fn u32_le(&mut self) -> Option<u32> {
        Some(u32::from_le_bytes(self.take(4)?.try_into().ok()?))
    }

    fn varint(&mut self) -> Option<u64> {
        let mut value = 0u64;
        for shift in (0..64).step_by(7) {
            let byte = self.take(1)?[0];
            value |= u64::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                return Some(value);
            }
        }
        None
    }

    fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
