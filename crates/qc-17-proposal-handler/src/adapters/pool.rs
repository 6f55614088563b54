//! In-memory ranked transaction source
//!
//! Ranks transactions by insertion order and removes them by hash. The
//! candidates offered by the consensus engine are ignored: the pool is the
//! authority on what to propose.

use crate::domain::ProposalTx;
use crate::error::SourceError;
use crate::ports::TransactionSource;
use parking_lot::RwLock;
use primitive_types::H256;
use std::collections::HashSet;
use tracing::debug;

/// Insertion-ordered transaction pool
#[derive(Debug, Default)]
pub struct InMemoryTxPool {
    inner: RwLock<PoolInner>,
}

#[derive(Debug, Default)]
struct PoolInner {
    txs: Vec<(H256, ProposalTx)>,
    hashes: HashSet<H256>,
}

impl InMemoryTxPool {
    /// Create an empty pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a transaction at the end of the ranking
    pub fn insert(&self, tx: ProposalTx) -> Result<H256, SourceError> {
        let hash = tx.hash();
        let mut inner = self.inner.write();

        if !inner.hashes.insert(hash) {
            return Err(SourceError::Other(format!(
                "duplicate transaction {}",
                hex::encode(hash.as_bytes())
            )));
        }
        inner.txs.push((hash, tx));
        Ok(hash)
    }

    /// Whether a transaction with this hash is held
    pub fn contains(&self, tx_hash: &H256) -> bool {
        self.inner.read().hashes.contains(tx_hash)
    }

    /// Number of held transactions
    pub fn len(&self) -> usize {
        self.inner.read().txs.len()
    }

    /// Whether the pool is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TransactionSource for InMemoryTxPool {
    fn select<'a>(
        &'a self,
        _candidates: &'a [Vec<u8>],
    ) -> Box<dyn Iterator<Item = ProposalTx> + Send + 'a> {
        // Snapshot, so removals during the scan do not contend with the iterator.
        let snapshot: Vec<ProposalTx> = self
            .inner
            .read()
            .txs
            .iter()
            .map(|(_, tx)| tx.clone())
            .collect();
        Box::new(snapshot.into_iter())
    }

    fn remove(&self, tx: &ProposalTx) -> Result<(), SourceError> {
        let hash = tx.hash();
        let mut inner = self.inner.write();

        if !inner.hashes.remove(&hash) {
            return Err(SourceError::TxNotFound);
        }
        inner.txs.retain(|(h, _)| *h != hash);

        debug!(tx_hash = %hex::encode(hash.as_bytes()), "[qc-17] Removed transaction from pool");
        Ok(())
    }
}
