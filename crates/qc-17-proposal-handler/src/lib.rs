//! # Quantum Chain - Proposal Handler (Subsystem 17)
//!
//! **Bounded Context:** Block Proposal Construction & Validation
//! **Architecture Compliance:** DDD + Hexagonal + TDD
//!
//! ## Purpose
//!
//! Decides which transactions go into a block proposal and whether a
//! proposal received from another validator is acceptable:
//! - Greedy prefix selection under a byte budget and a gas budget
//! - Per-signer sequence ordering within one proposal
//! - Removal of transactions that fail verification from the source
//! - Re-verification of received proposals with the same rules
//!
//! ## Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Adapters (Outer)                                   │
//! │  - InMemoryTxPool: ranked transaction source        │
//! │  - CodecTxVerifier: bincode wire verification       │
//! └─────────────────────────────────────────────────────┘
//!                         │
//! ┌─────────────────────────────────────────────────────┐
//! │  Ports (Middle)                                     │
//! │  - Inbound: ProposalHandler                         │
//! │  - Outbound: TransactionSource, ProposalTxVerifier  │
//! └─────────────────────────────────────────────────────┘
//!                         │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain (Inner - Pure Logic)                        │
//! │  - TxSelector / DefaultTxSelector                   │
//! │  - SignerSequenceTracker                            │
//! │  - Invariants: byte budget, gas budget, sequences   │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## Critical Invariants
//!
//! 1. **Byte Budget**: sum(len(tx)) ≤ max_tx_bytes
//! 2. **Gas Budget**: sum(tx.gas) ≤ max_block_gas when max_block_gas > 0
//! 3. **Sequence Ordering**: consecutive sequences per signer
//! 4. **Prefix Selection**: the scan never resumes after the selector halts
//! 5. **Symmetry**: a validator accepts what an honest builder produces
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! let pool = Arc::new(InMemoryTxPool::new());
//! let handler = DefaultProposalHandler::new(
//!     TxSourceMode::Ranked(pool),
//!     Arc::new(CodecTxVerifier::new()),
//! );
//! let response = handler.prepare_proposal(&params, request).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Reference adapters for the outbound ports
pub mod adapters;
/// Domain models and business logic
pub mod domain;
pub mod ports;
pub mod service;
pub mod telemetry;
pub mod utils;

mod config;
mod error;
mod metrics;

pub use config::{
    LoggingConfig, ProposalHandlerConfig, ENV_LOG_JSON, ENV_LOG_LEVEL, ENV_NOOP_SOURCE,
    ENV_VERIFY_INVARIANTS,
};
pub use error::{ConfigError, ProposalError, Result, SourceError, TxVerifyError};
pub use metrics::Metrics;

// Re-export commonly used types
pub use domain::{
    BlockParams, ConsensusParams, DefaultTxSelector, PrepareRequest, PrepareResponse,
    ProcessRequest, ProcessResponse, ProposalStatus, ProposalTx, SignerSequence,
    SignerSequenceTracker, TxSelector,
};

pub use ports::{ProposalHandler, ProposalTxVerifier, TransactionSource};

pub use adapters::{BincodeTxCodec, CodecTxVerifier, InMemoryTxPool, WireTx};

pub use service::{
    DefaultProposalHandler, NoOpProposalHandler, ProposalRejection, RejectionReason,
    TxSourceMode,
};

/// Subsystem identifier for IPC communication
pub const SUBSYSTEM_ID: u8 = 17;
