//! Fundamental types for the Warden wallet core.
//!
//! This crate defines the plain data shared across every other crate in the
//! workspace: keys and signatures, digests, timestamps, assets and weighted
//! authorities.

pub mod asset;
pub mod authority;
pub mod error;
pub mod hash;
pub mod keys;
pub mod time;

pub use asset::{Asset, BASE_SYMBOL};
pub use authority::{AccountName, Authority, AuthorityType, Weight};
pub use error::ParseError;
pub use hash::{BlockId, ChainId, Checksum, TransactionId};
pub use keys::{KeyPair, PrivateKey, PublicKey, Signature, PUBLIC_KEY_PREFIX};
pub use time::Timestamp;
