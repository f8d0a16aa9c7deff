//! Parse errors for the textual forms of keys and digests.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("missing prefix {0:?}")]
    InvalidPrefix(String),

    #[error("invalid base58: {0}")]
    Base58(String),

    #[error("invalid hex: {0}")]
    Hex(String),

    #[error("invalid length: expected {expected}, got {got}")]
    InvalidLength { expected: usize, got: usize },

    #[error("checksum mismatch")]
    ChecksumMismatch,
}
