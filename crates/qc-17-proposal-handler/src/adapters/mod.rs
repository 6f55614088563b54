//! Reference adapters for the outbound ports
//!
//! - [`InMemoryTxPool`]: ranked [`TransactionSource`](crate::ports::TransactionSource)
//! - [`CodecTxVerifier`]: [`ProposalTxVerifier`](crate::ports::ProposalTxVerifier)
//!   over the [`BincodeTxCodec`] wire format

pub mod codec;
pub mod pool;
pub mod verifier;

pub use codec::{BincodeTxCodec, WireTx};
pub use pool::InMemoryTxPool;
pub use verifier::CodecTxVerifier;
