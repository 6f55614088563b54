//! Metrics collection for the proposal handler subsystem

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics collector for proposal handling
#[derive(Debug, Default)]
pub struct Metrics {
    /// Total proposals built
    pub proposals_prepared: AtomicU64,

    /// Total received proposals evaluated
    pub proposals_processed: AtomicU64,

    /// Received proposals rejected
    pub proposals_rejected: AtomicU64,

    /// Transactions placed into built proposals
    pub transactions_selected: AtomicU64,

    /// Bytes placed into built proposals
    pub bytes_selected: AtomicU64,

    /// Transactions dropped from the source after failed verification
    pub transactions_removed: AtomicU64,

    /// Transactions skipped for breaking signer sequence order
    pub sequence_skips: AtomicU64,

    /// Total build time (microseconds)
    pub build_time_us: AtomicU64,
}

impl Metrics {
    /// Create new metrics collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a built proposal
    pub fn record_prepared(&self, tx_count: usize, bytes: u64, duration_us: u64) {
        self.proposals_prepared.fetch_add(1, Ordering::Relaxed);
        self.transactions_selected
            .fetch_add(tx_count as u64, Ordering::Relaxed);
        self.bytes_selected.fetch_add(bytes, Ordering::Relaxed);
        self.build_time_us.fetch_add(duration_us, Ordering::Relaxed);
    }

    /// Record an evaluated proposal
    pub fn record_processed(&self, accepted: bool) {
        self.proposals_processed.fetch_add(1, Ordering::Relaxed);
        if !accepted {
            self.proposals_rejected.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a transaction removed from the source
    pub fn record_removed(&self) {
        self.transactions_removed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a transaction skipped for sequence order
    pub fn record_sequence_skip(&self) {
        self.sequence_skips.fetch_add(1, Ordering::Relaxed);
    }

    /// Get proposals built
    pub fn get_proposals_prepared(&self) -> u64 {
        self.proposals_prepared.load(Ordering::Relaxed)
    }

    /// Get proposals rejected
    pub fn get_proposals_rejected(&self) -> u64 {
        self.proposals_rejected.load(Ordering::Relaxed)
    }

    /// Get transactions removed from the source
    pub fn get_transactions_removed(&self) -> u64 {
        self.transactions_removed.load(Ordering::Relaxed)
    }

    /// Get transactions skipped for sequence order
    pub fn get_sequence_skips(&self) -> u64 {
        self.sequence_skips.load(Ordering::Relaxed)
    }

    /// Get average transactions per built proposal
    pub fn get_avg_transactions_per_proposal(&self) -> f64 {
        let proposals = self.proposals_prepared.load(Ordering::Relaxed);
        if proposals == 0 {
            return 0.0;
        }
        let txs = self.transactions_selected.load(Ordering::Relaxed);
        txs as f64 / proposals as f64
    }

    /// Get average build time (microseconds)
    pub fn get_avg_build_time(&self) -> f64 {
        let proposals = self.proposals_prepared.load(Ordering::Relaxed);
        if proposals == 0 {
            return 0.0;
        }
        let time = self.build_time_us.load(Ordering::Relaxed);
        time as f64 / proposals as f64
    }
}
