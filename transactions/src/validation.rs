//! Stateless operation validation.
//!
//! Stateful checks (balances, account existence, authority satisfaction) are
//! done by the chain.

use warden_types::{AccountName, Asset, Authority, BASE_SYMBOL};

use crate::error::TransactionError;
use crate::Operation;

/// Upper bound on memo length in bytes, envelope included.
pub const MAX_MEMO_SIZE: usize = 2048;

pub const MIN_ACCOUNT_NAME_LENGTH: usize = 3;
pub const MAX_ACCOUNT_NAME_LENGTH: usize = 32;

/// Validate one operation's structure.
pub fn validate_operation(op: &Operation) -> Result<(), TransactionError> {
    validate_fee(op.fee())?;
    match op {
        Operation::Transfer(t) => {
            validate_account_name(&t.from)?;
            validate_account_name(&t.to)?;
            if t.from == t.to {
                return Err(TransactionError::SameAccount(t.from.clone()));
            }
            if t.amount.is_zero() {
                return Err(TransactionError::ZeroAmount);
            }
            if t.memo.len() > MAX_MEMO_SIZE {
                return Err(TransactionError::MemoTooLong {
                    len: t.memo.len(),
                    max: MAX_MEMO_SIZE,
                });
            }
        }
        Operation::AccountCreate(c) => {
            validate_account_name(&c.creator)?;
            if c.name_seed.is_empty() {
                return Err(TransactionError::InvalidAccountName {
                    name: c.name_seed.clone(),
                    reason: "name seed is empty".into(),
                });
            }
            validate_authority("owner", &c.owner)?;
            validate_authority("active", &c.active)?;
        }
        Operation::AccountUpdate(u) => {
            validate_account_name(&u.account)?;
            if let Some(owner) = &u.owner {
                validate_authority("owner", owner)?;
            }
        }
        Operation::RecoverAccount(r) => {
            validate_account_name(&r.account_to_recover)?;
            validate_authority("new owner", &r.new_owner_authority)?;
        }
    }
    Ok(())
}

/// Account names: lowercase letters, digits, `-` and `.`, starting with a
/// letter.
pub fn validate_account_name(name: &AccountName) -> Result<(), TransactionError> {
    let invalid = |reason: &str| TransactionError::InvalidAccountName {
        name: name.clone(),
        reason: reason.to_string(),
    };
    if name.len() < MIN_ACCOUNT_NAME_LENGTH || name.len() > MAX_ACCOUNT_NAME_LENGTH {
        return Err(invalid("length out of range"));
    }
    if !name.starts_with(|c: char| c.is_ascii_lowercase()) {
        return Err(invalid("must start with a lowercase letter"));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
    {
        return Err(invalid("contains an unsupported character"));
    }
    Ok(())
}

fn validate_fee(fee: &Asset) -> Result<(), TransactionError> {
    if fee.symbol != BASE_SYMBOL {
        return Err(TransactionError::InvalidFee {
            fee: fee.to_string(),
        });
    }
    Ok(())
}

fn validate_authority(label: &str, auth: &Authority) -> Result<(), TransactionError> {
    if auth.is_impossible() {
        return Err(TransactionError::ImpossibleAuthority(label.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TransferOp;

    fn transfer(from: &str, to: &str, amount: u64, memo: &str) -> Operation {
        Operation::Transfer(TransferOp {
            fee: Asset::default(),
            from: from.into(),
            to: to.into(),
            amount: Asset::base(amount),
            memo: memo.into(),
        })
    }

    #[test]
    fn valid_transfer() {
        assert!(validate_operation(&transfer("alice", "bob", 1, "hello")).is_ok());
    }

    #[test]
    fn zero_amount_rejected() {
        assert!(matches!(
            validate_operation(&transfer("alice", "bob", 0, "")),
            Err(TransactionError::ZeroAmount)
        ));
    }

    #[test]
    fn self_transfer_rejected() {
        assert!(matches!(
            validate_operation(&transfer("alice", "alice", 1, "")),
            Err(TransactionError::SameAccount(_))
        ));
    }

    #[test]
    fn oversized_memo_rejected() {
        let memo = "x".repeat(MAX_MEMO_SIZE + 1);
        assert!(matches!(
            validate_operation(&transfer("alice", "bob", 1, &memo)),
            Err(TransactionError::MemoTooLong { .. })
        ));
    }

    #[test]
    fn account_name_rules() {
        assert!(validate_account_name(&"alice.w-1".to_string()).is_ok());
        assert!(validate_account_name(&"ab".to_string()).is_err());
        assert!(validate_account_name(&"1alice".to_string()).is_err());
        assert!(validate_account_name(&"Alice".to_string()).is_err());
        assert!(validate_account_name(&"al ice".to_string()).is_err());
    }

    #[test]
    fn foreign_fee_symbol_rejected() {
        let mut op = transfer("alice", "bob", 1, "");
        op.set_fee(Asset::new(1, "XYZ"));
        assert!(matches!(
            validate_operation(&op),
            Err(TransactionError::InvalidFee { .. })
        ));
    }
}
