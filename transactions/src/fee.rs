//! Fee schedule published by the chain.

use serde::{Deserialize, Serialize};
use warden_types::Asset;

use crate::{Operation, Transaction};

/// Flat per-operation fee plus a per-byte charge on the operation payload,
/// both in the smallest unit of the base asset.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    pub operation_fee: u64,
    pub byte_fee: u64,
    /// Paid by the creator of a new account, in place of the schedule fee.
    #[serde(default)]
    pub account_creation_fee: u64,
}

impl FeeSchedule {
    /// Fee the chain requires for `op`.
    pub fn required_fee(&self, op: &Operation) -> Asset {
        let bytes = op.payload_len() as u64;
        Asset::base(
            self.operation_fee
                .saturating_add(self.byte_fee.saturating_mul(bytes)),
        )
    }

    pub fn creation_fee(&self) -> Asset {
        Asset::base(self.account_creation_fee)
    }

    /// Stamp every operation without a special fee with its required fee.
    /// Returns how many operations were updated.
    pub fn assign_fees(&self, tx: &mut Transaction) -> usize {
        let mut assigned = 0;
        for op in tx.operations.iter_mut() {
            if op.has_special_fee() {
                continue;
            }
            let fee = self.required_fee(op);
            op.set_fee(fee);
            assigned += 1;
        }
        assigned
    }
}
