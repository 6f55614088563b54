//! Wire encoding for transactions handled by the reference adapters
//!
//! Encoding is bincode with varint integers, a size limit and rejection of
//! trailing bytes, so every accepted byte string has exactly one decoding.

use crate::domain::{ProposalTx, SignerSequence};
use crate::error::TxVerifyError;
use bincode::Options;
use serde::{Deserialize, Serialize};

/// Largest encoded transaction the codec accepts
pub const MAX_ENCODED_TX_BYTES: u64 = 1024 * 1024;

/// Transaction layout on the wire
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireTx {
    /// Signers with the sequences they signed
    pub signers: Vec<SignerSequence>,

    /// Declared gas limit
    pub gas_limit: u64,

    /// Application payload
    #[serde(with = "serde_bytes")]
    pub payload: Vec<u8>,
}

impl WireTx {
    /// Single-signer transaction
    pub fn new(signer: SignerSequence, gas_limit: u64, payload: Vec<u8>) -> Self {
        Self {
            signers: vec![signer],
            gas_limit,
            payload,
        }
    }
}

/// Bincode codec for [`WireTx`]
#[derive(Clone, Copy, Debug, Default)]
pub struct BincodeTxCodec;

impl BincodeTxCodec {
    fn options() -> impl Options {
        bincode::DefaultOptions::new()
            .with_limit(MAX_ENCODED_TX_BYTES)
            .reject_trailing_bytes()
    }

    /// Encode a transaction
    pub fn encode(tx: &WireTx) -> Result<Vec<u8>, TxVerifyError> {
        Self::options()
            .serialize(tx)
            .map_err(|e| TxVerifyError::Encode(e.to_string()))
    }

    /// Decode a transaction
    pub fn decode(bytes: &[u8]) -> Result<WireTx, TxVerifyError> {
        Self::options()
            .deserialize(bytes)
            .map_err(|e| TxVerifyError::Decode(e.to_string()))
    }

    /// Encode a transaction and wrap it with its decoded fields
    pub fn to_proposal_tx(tx: &WireTx) -> Result<ProposalTx, TxVerifyError> {
        let bytes = Self::encode(tx)?;
        Ok(ProposalTx::decoded(bytes, tx.gas_limit, tx.signers.clone()))
    }

    /// Decode bytes into a [`ProposalTx`], keeping the original bytes
    pub fn decode_proposal_tx(bytes: &[u8]) -> Result<ProposalTx, TxVerifyError> {
        let wire = Self::decode(bytes)?;
        Ok(ProposalTx::decoded(bytes.to_vec(), wire.gas_limit, wire.signers))
    }
}
