//! Compact recoverable ECDSA signing over 32-byte digests.
//!
//! Only canonical signatures are produced: both `r` and `s` must be minimally
//! encoded positive integers, otherwise the signature is redone with fresh
//! nonce data.

use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::Message;
use warden_types::{PrivateKey, PublicKey, Signature};

use crate::error::CryptoError;
use crate::keys::{secp, secret_key};

/// Header offset for a signature made with a compressed public key.
const COMPACT_HEADER_BASE: u8 = 27 + 4;

/// Whether a compact signature has minimally encoded `r` and `s`.
pub fn is_canonical(sig: &[u8; 65]) -> bool {
    let minimal = |hi: u8, next: u8| hi & 0x80 == 0 && !(hi == 0 && next & 0x80 == 0);
    minimal(sig[1], sig[2]) && minimal(sig[33], sig[34])
}

/// Sign a digest, returning a canonical 65-byte compact signature.
pub fn sign_digest(digest: &[u8; 32], private: &PrivateKey) -> Result<Signature, CryptoError> {
    let sk = secret_key(private)?;
    let msg = Message::from_digest(*digest);
    let mut counter: u32 = 0;
    loop {
        let sig = if counter == 0 {
            secp().sign_ecdsa_recoverable(&msg, &sk)
        } else {
            let mut nonce_data = [0u8; 32];
            nonce_data[..4].copy_from_slice(&counter.to_le_bytes());
            secp().sign_ecdsa_recoverable_with_noncedata(&msg, &sk, &nonce_data)
        };
        let (recid, body) = sig.serialize_compact();
        let mut out = [0u8; 65];
        out[0] = COMPACT_HEADER_BASE + recid.to_i32() as u8;
        out[1..].copy_from_slice(&body);
        if is_canonical(&out) {
            return Ok(Signature(out));
        }
        counter += 1;
    }
}

/// Recover the signer's public key from a compact signature.
pub fn recover_public_key(digest: &[u8; 32], signature: &Signature) -> Result<PublicKey, CryptoError> {
    let header = signature.0[0];
    if !(27..=34).contains(&header) {
        return Err(CryptoError::InvalidSignature(format!(
            "bad header byte {header}"
        )));
    }
    let recid = RecoveryId::from_i32(i32::from((header - 27) & 3))
        .map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;
    let sig = RecoverableSignature::from_compact(&signature.0[1..], recid)
        .map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;
    let pk = secp()
        .recover_ecdsa(&Message::from_digest(*digest), &sig)
        .map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;
    Ok(PublicKey(pk.serialize()))
}

/// Verify that `signature` over `digest` was made by `public`.
pub fn verify_signature(digest: &[u8; 32], signature: &Signature, public: &PublicKey) -> bool {
    matches!(recover_public_key(digest, signature), Ok(recovered) if recovered == *public)
}
