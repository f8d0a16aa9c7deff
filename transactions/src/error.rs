use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("amount must be positive")]
    ZeroAmount,

    #[error("invalid account name {name:?}: {reason}")]
    InvalidAccountName { name: String, reason: String },

    #[error("sender and receiver are both {0}")]
    SameAccount(String),

    #[error("memo is {len} bytes, limit is {max}")]
    MemoTooLong { len: usize, max: usize },

    #[error("fee {fee} is not in the base asset")]
    InvalidFee { fee: String },

    #[error("{0} authority can never be satisfied")]
    ImpossibleAuthority(String),

    #[error("transaction has no operations")]
    Empty,

    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("{0}")]
    Other(String),
}
