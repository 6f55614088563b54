//! Decode-based transaction verifier
//!
//! Checks that bytes decode canonically, that the transaction has at least
//! one signer and that it is not on the deny list. The deny list stands in
//! for stateful validity checks (balance, fees, on-chain sequence), which
//! belong to the application.

use super::codec::BincodeTxCodec;
use crate::domain::ProposalTx;
use crate::error::TxVerifyError;
use crate::ports::ProposalTxVerifier;
use parking_lot::RwLock;
use primitive_types::H256;
use std::collections::HashSet;

/// Verifier backed by [`BincodeTxCodec`]
#[derive(Debug, Default)]
pub struct CodecTxVerifier {
    denied: RwLock<HashSet<H256>>,
}

impl CodecTxVerifier {
    /// Create a verifier with an empty deny list
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the transaction with this hash as invalid
    pub fn deny(&self, tx_hash: H256) {
        self.denied.write().insert(tx_hash);
    }

    /// Remove a transaction from the deny list
    pub fn allow(&self, tx_hash: &H256) {
        self.denied.write().remove(tx_hash);
    }

    fn verify_bytes(&self, tx_bytes: &[u8]) -> Result<ProposalTx, TxVerifyError> {
        let tx = BincodeTxCodec::decode_proposal_tx(tx_bytes)?;

        if tx.signer_sequences.as_ref().map_or(true, Vec::is_empty) {
            return Err(TxVerifyError::InvalidSignature);
        }

        if self.denied.read().contains(&tx.hash()) {
            return Err(TxVerifyError::Rejected("denied".to_string()));
        }

        Ok(tx)
    }
}

impl ProposalTxVerifier for CodecTxVerifier {
    fn prepare_proposal_verify_tx(&self, tx: &ProposalTx) -> Result<Vec<u8>, TxVerifyError> {
        let verified = self.verify_bytes(&tx.bytes)?;
        let wire = BincodeTxCodec::decode(&verified.bytes)?;
        BincodeTxCodec::encode(&wire)
    }

    fn process_proposal_verify_tx(&self, tx_bytes: &[u8]) -> Result<ProposalTx, TxVerifyError> {
        let tx = self.verify_bytes(tx_bytes)?;
        let canonical = BincodeTxCodec::encode(&BincodeTxCodec::decode(tx_bytes)?)?;
        if canonical != tx_bytes {
            return Err(TxVerifyError::Decode("non-canonical encoding".to_string()));
        }
        Ok(tx)
    }
}
