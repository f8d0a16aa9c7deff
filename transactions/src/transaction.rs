//! Transactions: a list of operations bound to a recent block and an
//! expiration time, plus the signatures that authorize them.

use serde::{Deserialize, Serialize};
use warden_types::{BlockId, ChainId, Signature, Timestamp, TransactionId};

use crate::error::TransactionError;
use crate::{Operation, RequiredAuthorities};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Low 16 bits of the reference block number.
    pub ref_block_num: u16,
    /// Bytes 4..8 of the reference block id, little-endian.
    pub ref_block_prefix: u32,
    pub expiration: Timestamp,
    pub operations: Vec<Operation>,
    #[serde(default)]
    pub signatures: Vec<Signature>,
}

/// Signed content only; signatures never sign themselves.
#[derive(Serialize)]
struct UnsignedView<'a> {
    ref_block_num: u16,
    ref_block_prefix: u32,
    expiration: Timestamp,
    operations: &'a [Operation],
}

impl Transaction {
    pub fn new(operations: Vec<Operation>) -> Self {
        Self {
            operations,
            ..Default::default()
        }
    }

    /// Tie the transaction to `block` so it cannot be replayed on a fork
    /// that lacks it.
    pub fn set_reference_block(&mut self, block: &BlockId) {
        self.ref_block_num = block.block_num() as u16;
        let bytes = block.as_bytes();
        self.ref_block_prefix = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    }

    pub fn set_expiration(&mut self, expiration: Timestamp) {
        self.expiration = expiration;
    }

    /// Canonical bytes of everything but the signatures.
    pub fn unsigned_bytes(&self) -> Result<Vec<u8>, TransactionError> {
        let view = UnsignedView {
            ref_block_num: self.ref_block_num,
            ref_block_prefix: self.ref_block_prefix,
            expiration: self.expiration,
            operations: &self.operations,
        };
        bincode::serialize(&view).map_err(|e| TransactionError::Serialization(e.to_string()))
    }

    /// Digest each signature commits to: SHA-256(chain_id ‖ unsigned bytes).
    pub fn sig_digest(&self, chain_id: &ChainId) -> Result<[u8; 32], TransactionError> {
        let body = self.unsigned_bytes()?;
        Ok(warden_crypto::sha256_multi(&[chain_id.as_bytes(), &body]))
    }

    /// First 20 bytes of SHA-256 over the unsigned bytes.
    pub fn id(&self) -> Result<TransactionId, TransactionError> {
        let digest = warden_crypto::sha256(&self.unsigned_bytes()?);
        let mut id = [0u8; 20];
        id.copy_from_slice(&digest[..20]);
        Ok(TransactionId::new(id))
    }

    /// Union of what every operation needs.
    pub fn required_authorities(&self) -> RequiredAuthorities {
        let mut required = RequiredAuthorities::default();
        for op in &self.operations {
            op.collect_required_authorities(&mut required);
        }
        required
    }

    /// Stateless checks of every operation.
    pub fn validate(&self) -> Result<(), TransactionError> {
        if self.operations.is_empty() {
            return Err(TransactionError::Empty);
        }
        for op in &self.operations {
            crate::validation::validate_operation(op)?;
        }
        Ok(())
    }
}

/// A transaction together with where the chain included it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedTransaction {
    pub transaction: Transaction,
    pub transaction_id: TransactionId,
    pub block_num: u32,
    pub transaction_num: u32,
}
