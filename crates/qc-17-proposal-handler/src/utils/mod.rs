//! Utility modules for proposal handling

pub mod hashing;

pub use hashing::{sha256, transaction_hash, tx_hash_hex};
