//! Key agreement and symmetric encryption for account-to-account messages.
//!
//! The shared secret is SHA-512 over the x-coordinate of the ECDH point, so
//! both parties obtain the same 64 bytes from their own private key and the
//! counterparty's public key. The 64-byte value keys AES-256-CBC: the first
//! 32 bytes are the cipher key and the next 16 bytes the IV.

use aes::Aes256;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use warden_types::{PrivateKey, PublicKey};
use zeroize::Zeroizing;

use crate::error::CryptoError;
use crate::hash::sha512;
use crate::keys::{curve_public_key, secret_key};

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Compute the 64-byte ECDH shared secret between `private` and `public`.
pub fn shared_secret(private: &PrivateKey, public: &PublicKey) -> Result<[u8; 64], CryptoError> {
    let sk = secret_key(private)?;
    let pk = curve_public_key(public)?;
    let point = Zeroizing::new(secp256k1::ecdh::shared_secret_point(&pk, &sk));
    Ok(sha512(&point[..32]))
}

/// Encrypt `plain` under a 64-byte key (AES-256-CBC, PKCS#7 padding).
pub fn aes_encrypt(key: &[u8; 64], plain: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let cipher = Aes256CbcEnc::new_from_slices(&key[..32], &key[32..48])
        .map_err(|e| CryptoError::Decryption(format!("cipher init: {e}")))?;
    Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(plain))
}

/// Decrypt data produced by [`aes_encrypt`] with the same key.
pub fn aes_decrypt(key: &[u8; 64], data: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let cipher = Aes256CbcDec::new_from_slices(&key[..32], &key[32..48])
        .map_err(|e| CryptoError::Decryption(format!("cipher init: {e}")))?;
    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(data)
        .map_err(|_| CryptoError::Decryption("bad padding or truncated ciphertext".into()))
}
