//! Domain layer - Pure logic for proposal construction and validation
//!
//! Everything here is synchronous and free of I/O. The service layer drives
//! these types once per prepare/process cycle.
//!
//! ## Entities
//!
//! - [`ProposalTx`]: transaction bytes with optional decoded gas and signers
//! - [`PrepareRequest`] / [`PrepareResponse`]: build exchange
//! - [`ProcessRequest`] / [`ProcessResponse`]: validate exchange
//! - [`ConsensusParams`]: block gas ceiling
//!
//! ## Services
//!
//! - [`TxSelector`] / [`DefaultTxSelector`]: budgeted prefix selection
//! - [`SignerSequenceTracker`]: consecutive sequences per signer
//!
//! ## Invariants
//!
//! 1. Selected bytes never exceed the request byte budget
//! 2. Selected gas never exceeds a positive block gas budget
//! 3. Sequences of one signer increase by exactly 1 in admission order

mod entities;
pub mod invariants;
pub mod selector;
pub mod sequence;

pub use entities::*;
pub use selector::{DefaultTxSelector, TxSelector};
pub use sequence::{PendingSequences, SequenceViolation, SignerSequenceTracker};
