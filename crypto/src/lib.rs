//! Cryptographic primitives for the Warden wallet core.
//!
//! - **secp256k1** keys, compact recoverable signatures and ECDH
//! - **SHA-256 / SHA-512 / RIPEMD-160** hashing
//! - **AES-256-CBC** for account-to-account memo encryption
//! - Brain-key phrases and deterministic key derivation

pub mod brain_key;
pub mod encryption;
pub mod error;
pub mod extended;
pub mod hash;
pub mod keys;
pub mod sign;

pub use brain_key::{
    brain_key_from_entropy, brain_key_info, generate_brain_key, normalize_brain_key,
    BrainKeyInfo, BRAIN_KEY_WORD_COUNT,
};
pub use encryption::{aes_decrypt, aes_encrypt, shared_secret};
pub use error::CryptoError;
pub use extended::parse_extended_private_key;
pub use hash::{ripemd160, sha256, sha256_multi, sha256d, sha512, sha512_multi};
pub use keys::{
    derive_private_key, generate_keypair, generate_private_key, key_to_wif,
    keypair_from_private, private_from_secret, private_from_seed_string, public_from_private,
    wif_to_key,
};
pub use sign::{is_canonical, recover_public_key, sign_digest, verify_signature};
