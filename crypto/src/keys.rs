//! secp256k1 key generation, exportable (WIF) key strings and deterministic
//! derivation.
//!
//! `derive_private_key` is part of the wallet interchange contract: any
//! wallet re-deriving keys from the same seed string and index must obtain
//! the same secret, so both hash stages and their order are fixed.

use std::sync::OnceLock;

use rand::rngs::OsRng;
use rand::RngCore;
use secp256k1::{All, Secp256k1, SecretKey};
use warden_types::{KeyPair, PrivateKey, PublicKey};
use zeroize::Zeroizing;

use crate::error::CryptoError;
use crate::hash::{sha256, sha256d, sha512};

/// Version byte that prefixes every exportable private key.
const WIF_VERSION: u8 = 0x80;

pub(crate) fn secp() -> &'static Secp256k1<All> {
    static SECP: OnceLock<Secp256k1<All>> = OnceLock::new();
    SECP.get_or_init(Secp256k1::new)
}

pub(crate) fn secret_key(private: &PrivateKey) -> Result<SecretKey, CryptoError> {
    SecretKey::from_slice(&private.0).map_err(|e| CryptoError::InvalidPrivateKey(e.to_string()))
}

pub(crate) fn curve_public_key(public: &PublicKey) -> Result<secp256k1::PublicKey, CryptoError> {
    secp256k1::PublicKey::from_slice(public.as_bytes())
        .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))
}

/// Generate a new private key from a secure random source.
pub fn generate_private_key() -> PrivateKey {
    let mut bytes = Zeroizing::new([0u8; 32]);
    loop {
        OsRng.fill_bytes(bytes.as_mut());
        if SecretKey::from_slice(bytes.as_ref()).is_ok() {
            return PrivateKey(*bytes);
        }
    }
}

/// Generate a new secp256k1 key pair from a secure random source.
pub fn generate_keypair() -> KeyPair {
    let private = generate_private_key();
    // A key produced by `generate_private_key` is always in range.
    let public = match public_from_private(&private) {
        Ok(public) => public,
        Err(_) => unreachable!("generated secret is validated before use"),
    };
    KeyPair { public, private }
}

/// Derive the compressed public key from a private key.
pub fn public_from_private(private: &PrivateKey) -> Result<PublicKey, CryptoError> {
    let sk = secret_key(private)?;
    let pk = secp256k1::PublicKey::from_secret_key(secp(), &sk);
    Ok(PublicKey(pk.serialize()))
}

/// Reconstruct a full key pair from a private key.
pub fn keypair_from_private(private: PrivateKey) -> Result<KeyPair, CryptoError> {
    let public = public_from_private(&private)?;
    Ok(KeyPair { public, private })
}

/// Use a 256-bit value directly as a secret scalar.
///
/// Fails only for zero or values at or above the curve order.
pub fn private_from_secret(secret: &[u8; 32]) -> Result<PrivateKey, CryptoError> {
    SecretKey::from_slice(secret).map_err(|e| CryptoError::InvalidPrivateKey(e.to_string()))?;
    Ok(PrivateKey(*secret))
}

/// Derive the `index`-th key of the sequence seeded by `seed`.
///
/// `secret = SHA256(SHA512(seed + " " + decimal(index)))`.
pub fn derive_private_key(seed: &str, index: u32) -> Result<PrivateKey, CryptoError> {
    let input = Zeroizing::new(format!("{} {}", seed, index));
    let wide = Zeroizing::new(sha512(input.as_bytes()));
    let secret = Zeroizing::new(sha256(wide.as_ref()));
    private_from_secret(&secret)
}

/// Derive a key from a password-style seed: `secret = SHA256(seed)`.
pub fn private_from_seed_string(seed: &str) -> Result<PrivateKey, CryptoError> {
    let secret = Zeroizing::new(sha256(seed.as_bytes()));
    private_from_secret(&secret)
}

/// Encode a private key in wallet import format.
pub fn key_to_wif(private: &PrivateKey) -> Zeroizing<String> {
    let mut data = Zeroizing::new(Vec::with_capacity(37));
    data.push(WIF_VERSION);
    data.extend_from_slice(&private.0);
    let check = sha256d(&data);
    data.extend_from_slice(&check[..4]);
    Zeroizing::new(bs58::encode(data.as_slice()).into_string())
}

/// Parse a wallet-import-format string.
///
/// Both the double-SHA256 checksum and the legacy single-SHA256 checksum
/// are accepted.
pub fn wif_to_key(wif: &str) -> Result<PrivateKey, CryptoError> {
    let data = Zeroizing::new(
        bs58::decode(wif.trim())
            .into_vec()
            .map_err(|e| CryptoError::InvalidPrivateKey(format!("base58: {e}")))?,
    );
    if data.len() != 37 {
        return Err(CryptoError::InvalidPrivateKey(format!(
            "expected 37 bytes, got {}",
            data.len()
        )));
    }
    if data[0] != WIF_VERSION {
        return Err(CryptoError::InvalidPrivateKey(format!(
            "unexpected version byte {:#04x}",
            data[0]
        )));
    }
    let (body, check) = data.split_at(33);
    let single = sha256(body);
    let double = sha256(&single);
    if check != &double[..4] && check != &single[..4] {
        return Err(CryptoError::InvalidPrivateKey("checksum mismatch".into()));
    }
    let mut secret = Zeroizing::new([0u8; 32]);
    secret.copy_from_slice(&body[1..]);
    private_from_secret(&secret)
}
