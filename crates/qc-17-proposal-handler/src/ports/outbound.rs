//! Outbound ports (driven side - SPI)
//!
//! The proposal handler consumes these capabilities and never implements
//! them itself; reference implementations live in [`crate::adapters`].

use crate::domain::ProposalTx;
use crate::error::{SourceError, TxVerifyError};

/// Port: ranked transaction source (usually the mempool)
pub trait TransactionSource: Send + Sync {
    /// Enumerate transactions in the order they should be considered.
    ///
    /// `candidates` are the raw transactions the consensus engine offered;
    /// a source with its own ordering may ignore them.
    fn select<'a>(
        &'a self,
        candidates: &'a [Vec<u8>],
    ) -> Box<dyn Iterator<Item = ProposalTx> + Send + 'a>;

    /// Permanently drop a transaction that failed verification.
    ///
    /// Returns [`SourceError::TxNotFound`] if the transaction is not held.
    fn remove(&self, tx: &ProposalTx) -> Result<(), SourceError>;
}

/// Port: transaction verification shared by the build and validate paths.
///
/// Both methods must apply the same validity rules, otherwise honest
/// proposals can be rejected by honest validators.
pub trait ProposalTxVerifier: Send + Sync {
    /// Verify a transaction taken from the source and return its canonical
    /// encoding.
    fn prepare_proposal_verify_tx(&self, tx: &ProposalTx) -> Result<Vec<u8>, TxVerifyError>;

    /// Decode and verify a transaction received in a proposal.
    fn process_proposal_verify_tx(&self, tx_bytes: &[u8]) -> Result<ProposalTx, TxVerifyError>;
}
