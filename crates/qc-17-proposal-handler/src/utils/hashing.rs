//! Hashing utilities for proposal handling
//!
//! Transaction hashes identify transactions when they are removed from a
//! source and in log fields. They play no part in selection.

use primitive_types::H256;
use sha2::{Digest, Sha256};

/// Compute SHA-256 hash of data
#[inline]
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Compute transaction hash
///
/// Returns H256 hash of transaction data
pub fn transaction_hash(tx: &[u8]) -> H256 {
    H256::from(sha256(tx))
}

/// Hex-encoded transaction hash, for log fields and error messages
pub fn tx_hash_hex(tx: &[u8]) -> String {
    hex::encode(transaction_hash(tx).as_bytes())
}
