//! Domain entities for proposal handling

use primitive_types::H256;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 20-byte account address of a transaction signer
pub type Address = [u8; 20];

/// One signer of a transaction together with the sequence it signed
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignerSequence {
    /// Signer account address
    pub signer: Address,

    /// Sequence number signed by this signer
    pub sequence: u64,
}

impl SignerSequence {
    /// Create a new signer/sequence pair
    pub fn new(signer: Address, sequence: u64) -> Self {
        Self { signer, sequence }
    }
}

impl fmt::Display for SignerSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", hex::encode(self.signer), self.sequence)
    }
}

/// Transaction as seen by the proposal handler
///
/// `bytes` is the encoded form used for size accounting. The decoded fields
/// are only present when decoding succeeded; their absence is not an error.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalTx {
    /// Encoded transaction bytes
    #[serde(with = "serde_bytes")]
    pub bytes: Vec<u8>,

    /// Declared gas limit
    pub declared_gas: Option<u64>,

    /// Signers with the sequences they signed
    pub signer_sequences: Option<Vec<SignerSequence>>,
}

impl ProposalTx {
    /// Transaction whose contents could not be decoded
    pub fn opaque(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            declared_gas: None,
            signer_sequences: None,
        }
    }

    /// Decoded transaction
    pub fn decoded(bytes: Vec<u8>, declared_gas: u64, signers: Vec<SignerSequence>) -> Self {
        Self {
            bytes,
            declared_gas: Some(declared_gas),
            signer_sequences: Some(signers),
        }
    }

    /// SHA-256 hash of the encoded bytes
    pub fn hash(&self) -> H256 {
        crate::utils::transaction_hash(&self.bytes)
    }

    /// Encoded size in bytes
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Request from the consensus engine to build a proposal
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrepareRequest {
    /// Height of the block being proposed
    pub height: u64,

    /// Raw candidate transactions offered by the engine, in FIFO order
    pub txs: Vec<Vec<u8>>,

    /// Maximum total bytes of selected transactions
    pub max_tx_bytes: u64,
}

/// Transactions selected for the proposal
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrepareResponse {
    /// Selected transactions in proposal order
    pub txs: Vec<Vec<u8>>,
}

/// Request from the consensus engine to validate a received proposal
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRequest {
    /// Height of the proposed block
    pub height: u64,

    /// Proposed transactions in order
    pub txs: Vec<Vec<u8>>,
}

/// Verdict on a received proposal
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalStatus {
    /// Proposal is valid
    Accept,

    /// Proposal must not be voted for
    Reject,
}

/// Response to a [`ProcessRequest`]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessResponse {
    /// Verdict
    pub status: ProposalStatus,
}

impl ProcessResponse {
    /// Accepting response
    pub fn accept() -> Self {
        Self {
            status: ProposalStatus::Accept,
        }
    }

    /// Rejecting response
    pub fn reject() -> Self {
        Self {
            status: ProposalStatus::Reject,
        }
    }

    /// Whether the proposal was accepted
    pub fn is_accepted(&self) -> bool {
        self.status == ProposalStatus::Accept
    }
}

/// Block limits from the chain-wide consensus parameters
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockParams {
    /// Maximum block size in bytes
    pub max_bytes: i64,

    /// Maximum block gas (-1 or 0 means unlimited)
    pub max_gas: i64,
}

/// Consensus parameters in effect for the current height
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusParams {
    /// Block parameters, absent before genesis params are loaded
    pub block: Option<BlockParams>,
}

impl ConsensusParams {
    /// Parameters with the given block gas ceiling
    pub fn with_max_gas(max_gas: i64) -> Self {
        Self {
            block: Some(BlockParams {
                max_bytes: 0,
                max_gas,
            }),
        }
    }

    /// Block gas budget; 0 means unlimited
    pub fn max_block_gas(&self) -> u64 {
        self.block
            .map(|b| u64::try_from(b.max_gas).unwrap_or(0))
            .unwrap_or(0)
    }
}
