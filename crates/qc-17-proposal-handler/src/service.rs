//! Concrete Proposal Handler Implementation
//!
//! [`DefaultProposalHandler`] builds proposals from a ranked transaction
//! source and validates proposals received from other validators. Both paths
//! share one verifier so that a validator accepts whatever an honest builder
//! would have produced.
//!
//! [`NoOpProposalHandler`] passes the engine's transactions through and
//! accepts every proposal.

use crate::{
    config::ProposalHandlerConfig,
    domain::{
        invariants, ConsensusParams, DefaultTxSelector, PrepareRequest, PrepareResponse,
        ProcessRequest, ProcessResponse, ProposalTx, SignerSequenceTracker, TxSelector,
    },
    error::{ProposalError, Result, SourceError, TxVerifyError},
    metrics::Metrics,
    ports::{ProposalHandler, ProposalTxVerifier, TransactionSource},
    utils::tx_hash_hex,
};
use async_trait::async_trait;
use parking_lot::{Mutex, MutexGuard};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Where the builder takes transactions from. Chosen once at construction.
#[derive(Clone)]
pub enum TxSourceMode {
    /// Ranked source, usually the mempool
    Ranked(Arc<dyn TransactionSource>),

    /// No source: replay the engine's candidates in the order offered
    NoOp,
}

impl TxSourceMode {
    /// Whether this is the no-op mode
    pub fn is_noop(&self) -> bool {
        matches!(self, Self::NoOp)
    }
}

impl fmt::Debug for TxSourceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ranked(_) => f.write_str("Ranked"),
            Self::NoOp => f.write_str("NoOp"),
        }
    }
}

/// Why a received proposal was rejected
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RejectionReason {
    /// A transaction failed verification
    InvalidTx(TxVerifyError),

    /// Declared gas of the transactions so far exceeds the block budget
    GasBudgetExceeded {
        /// Gas accumulated up to and including the offending transaction
        total_gas: u64,
        /// Block gas budget
        max_block_gas: u64,
    },
}

/// Rejection of a received proposal, with the offending transaction index
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProposalRejection {
    /// Index of the transaction that caused the rejection
    pub index: usize,
    /// Cause
    pub reason: RejectionReason,
}

impl fmt::Display for ProposalRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            RejectionReason::InvalidTx(err) => write!(f, "tx {} invalid: {}", self.index, err),
            RejectionReason::GasBudgetExceeded {
                total_gas,
                max_block_gas,
            } => write!(
                f,
                "tx {} exceeds block gas: {} > {}",
                self.index, total_gas, max_block_gas
            ),
        }
    }
}

/// Exclusive use of the selector for one build.
///
/// The selector is cleared when the cycle starts and again when the guard
/// drops, on every exit path including unwinding.
struct SelectionCycle<'a> {
    selector: MutexGuard<'a, Box<dyn TxSelector>>,
}

impl<'a> SelectionCycle<'a> {
    fn enter(selector: &'a Mutex<Box<dyn TxSelector>>) -> Self {
        let mut selector = selector.lock();
        selector.clear();
        Self { selector }
    }
}

impl Drop for SelectionCycle<'_> {
    fn drop(&mut self) {
        self.selector.clear();
    }
}

/// Default proposal handler
pub struct DefaultProposalHandler {
    /// Transaction source for the build path
    source: TxSourceMode,

    /// Verifier shared by both paths
    verifier: Arc<dyn ProposalTxVerifier>,

    /// Cycle-scoped selection state; the lock serialises concurrent builds
    selector: Mutex<Box<dyn TxSelector>>,

    /// Handler configuration
    config: ProposalHandlerConfig,

    /// Counters
    metrics: Arc<Metrics>,
}

impl DefaultProposalHandler {
    /// Create a handler with the default selector and configuration
    pub fn new(source: TxSourceMode, verifier: Arc<dyn ProposalTxVerifier>) -> Self {
        info!("[qc-17] Initializing Proposal Handler");
        info!("  Source: {:?}", source);

        Self {
            source,
            verifier,
            selector: Mutex::new(Box::new(DefaultTxSelector::new())),
            config: ProposalHandlerConfig::default(),
            metrics: Arc::new(Metrics::new()),
        }
    }

    /// Create a handler from configuration.
    ///
    /// `noop_source`, or a missing source, selects [`TxSourceMode::NoOp`].
    pub fn from_config(
        config: ProposalHandlerConfig,
        source: Option<Arc<dyn TransactionSource>>,
        verifier: Arc<dyn ProposalTxVerifier>,
    ) -> Self {
        let mode = match source {
            Some(source) if !config.noop_source => TxSourceMode::Ranked(source),
            _ => TxSourceMode::NoOp,
        };
        Self::new(mode, verifier).with_config(config)
    }

    /// Replace the configuration
    pub fn with_config(mut self, config: ProposalHandlerConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the transaction selector
    pub fn with_tx_selector(mut self, selector: Box<dyn TxSelector>) -> Self {
        self.selector = Mutex::new(selector);
        self
    }

    /// Source mode in use
    pub fn source_mode(&self) -> &TxSourceMode {
        &self.source
    }

    /// Handler configuration
    pub fn config(&self) -> &ProposalHandlerConfig {
        &self.config
    }

    /// Shared metrics
    pub fn metrics(&self) -> Arc<Metrics> {
        Arc::clone(&self.metrics)
    }

    /// Build a proposal.
    ///
    /// Without a source, the engine's candidates are replayed in order under
    /// the byte budget only. With a source, candidates are filtered by signer
    /// sequence, verified (failures are removed from the source) and offered
    /// to the selector until it halts or the source is exhausted.
    #[tracing::instrument(
        skip_all,
        fields(height = request.height, candidates = request.txs.len(), max_tx_bytes = request.max_tx_bytes)
    )]
    pub fn build_proposal(
        &self,
        params: &ConsensusParams,
        request: PrepareRequest,
    ) -> Result<PrepareResponse> {
        let started = Instant::now();
        let max_tx_bytes = request.max_tx_bytes;
        let max_block_gas = params.max_block_gas();

        let mut cycle = SelectionCycle::enter(&self.selector);

        let admitted = match &self.source {
            TxSourceMode::NoOp => {
                // Raw bytes cannot be decoded here, so gas is not accounted.
                for tx_bytes in request.txs {
                    if cycle
                        .selector
                        .select_tx_for_proposal(max_tx_bytes, max_block_gas, None, tx_bytes)
                    {
                        break;
                    }
                }
                None
            }
            TxSourceMode::Ranked(source) => Some(self.select_from_source(
                &mut cycle,
                source.as_ref(),
                &request.txs,
                max_tx_bytes,
                max_block_gas,
            )?),
        };

        let txs = cycle.selector.selected_txs();

        if self.config.verify_selected_invariants {
            invariants::check_byte_budget(&txs, max_tx_bytes)?;
            if let Some(admitted) = &admitted {
                invariants::check_gas_budget(admitted, max_block_gas)?;
                invariants::check_signer_sequences(admitted)?;
            }
        }

        let bytes: u64 = txs.iter().map(|tx| tx.len() as u64).sum();
        let elapsed_us = started.elapsed().as_micros() as u64;
        self.metrics.record_prepared(txs.len(), bytes, elapsed_us);

        info!(
            selected = txs.len(),
            bytes,
            max_block_gas,
            elapsed_us,
            "[qc-17] Proposal prepared"
        );

        Ok(PrepareResponse { txs })
    }

    /// Scan the ranked source. Returns the admitted transactions, as the
    /// source provided them, for invariant checks.
    fn select_from_source(
        &self,
        cycle: &mut SelectionCycle<'_>,
        source: &dyn TransactionSource,
        candidates: &[Vec<u8>],
        max_tx_bytes: u64,
        max_block_gas: u64,
    ) -> Result<Vec<ProposalTx>> {
        let mut tracker = SignerSequenceTracker::new();
        let mut admitted = Vec::new();
        let mut selected_len = cycle.selector.selected_len();

        for tx in source.select(candidates) {
            let Some(pairs) = tx.signer_sequences.as_deref() else {
                error!(
                    tx_hash = %tx_hash_hex(&tx.bytes),
                    "[qc-17] Source transaction has no signer data"
                );
                return Err(ProposalError::MissingSignerData {
                    tx_hash: tx_hash_hex(&tx.bytes),
                });
            };

            let pending = match tracker.check(pairs) {
                Ok(pending) => pending,
                Err(violation) => {
                    debug!(%violation, "[qc-17] Skipping out-of-sequence transaction");
                    self.metrics.record_sequence_skip();
                    continue;
                }
            };

            let tx_bytes = match self.verifier.prepare_proposal_verify_tx(&tx) {
                Ok(tx_bytes) => tx_bytes,
                Err(err) => {
                    warn!(
                        tx_hash = %tx_hash_hex(&tx.bytes),
                        error = %err,
                        "[qc-17] Transaction failed verification, removing from source"
                    );
                    self.remove_from_source(source, &tx)?;
                    continue;
                }
            };

            let halt = cycle.selector.select_tx_for_proposal(
                max_tx_bytes,
                max_block_gas,
                tx.declared_gas,
                tx_bytes,
            );

            let now_len = cycle.selector.selected_len();
            if now_len != selected_len {
                tracker.commit(&pending);
                admitted.push(tx);
            } else {
                // Verified but over budget: its sequence is known to be valid.
                tracker.note_verified(&pending);
            }
            selected_len = now_len;

            if halt {
                debug!(selected = selected_len, "[qc-17] Selector halted");
                break;
            }
        }

        Ok(admitted)
    }

    fn remove_from_source(&self, source: &dyn TransactionSource, tx: &ProposalTx) -> Result<()> {
        match source.remove(tx) {
            Ok(()) => {
                self.metrics.record_removed();
                Ok(())
            }
            Err(SourceError::TxNotFound) => Ok(()),
            Err(err) => Err(ProposalError::SourceRemoval {
                tx_hash: tx_hash_hex(&tx.bytes),
                source: err,
            }),
        }
    }

    /// Validate a received proposal.
    ///
    /// Every transaction must verify and, under a positive block gas budget,
    /// the accumulated declared gas must stay within it. Without a source
    /// every proposal is valid, since the builder could not account gas.
    #[tracing::instrument(skip_all, fields(height = request.height, txs = request.txs.len()))]
    pub fn validate_proposal(
        &self,
        params: &ConsensusParams,
        request: &ProcessRequest,
    ) -> std::result::Result<(), ProposalRejection> {
        if self.source.is_noop() {
            return Ok(());
        }

        let max_block_gas = params.max_block_gas();
        let mut total_gas = 0u64;

        for (index, tx_bytes) in request.txs.iter().enumerate() {
            let tx = self
                .verifier
                .process_proposal_verify_tx(tx_bytes)
                .map_err(|err| ProposalRejection {
                    index,
                    reason: RejectionReason::InvalidTx(err),
                })?;

            if max_block_gas > 0 {
                total_gas = total_gas.saturating_add(tx.declared_gas.unwrap_or(0));
                if total_gas > max_block_gas {
                    return Err(ProposalRejection {
                        index,
                        reason: RejectionReason::GasBudgetExceeded {
                            total_gas,
                            max_block_gas,
                        },
                    });
                }
            }
        }

        Ok(())
    }
}

#[async_trait]
impl ProposalHandler for DefaultProposalHandler {
    async fn prepare_proposal(
        &self,
        params: &ConsensusParams,
        request: PrepareRequest,
    ) -> Result<PrepareResponse> {
        self.build_proposal(params, request)
    }

    async fn process_proposal(
        &self,
        params: &ConsensusParams,
        request: ProcessRequest,
    ) -> Result<ProcessResponse> {
        match self.validate_proposal(params, &request) {
            Ok(()) => {
                self.metrics.record_processed(true);
                debug!(
                    height = request.height,
                    txs = request.txs.len(),
                    "[qc-17] Proposal accepted"
                );
                Ok(ProcessResponse::accept())
            }
            Err(rejection) => {
                self.metrics.record_processed(false);
                let proposal = serde_json::to_string(&request).unwrap_or_default();
                error!(
                    height = request.height,
                    tx_index = rejection.index,
                    reason = %rejection,
                    proposal = %proposal,
                    "[qc-17] Proposal rejected"
                );
                Ok(ProcessResponse::reject())
            }
        }
    }
}

/// Handler that proposes the engine's transactions unchanged and accepts
/// every proposal
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpProposalHandler;

#[async_trait]
impl ProposalHandler for NoOpProposalHandler {
    async fn prepare_proposal(
        &self,
        _params: &ConsensusParams,
        request: PrepareRequest,
    ) -> Result<PrepareResponse> {
        Ok(PrepareResponse { txs: request.txs })
    }

    async fn process_proposal(
        &self,
        _params: &ConsensusParams,
        _request: ProcessRequest,
    ) -> Result<ProcessResponse> {
        Ok(ProcessResponse::accept())
    }
}
