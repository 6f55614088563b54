//! Budgeted transaction selection
//!
//! A [`TxSelector`] accumulates transactions for one proposal while keeping
//! the running byte and gas totals within the request budgets. It is
//! cycle-scoped state: the handler clears it after every build.
//!
//! Totals are compared with checked arithmetic, so oversized or hostile
//! declared gas values are excluded rather than wrapping.

/// Accumulates transactions for a proposal under byte and gas budgets
pub trait TxSelector: Send {
    /// Copy of the transactions selected so far, in admission order
    fn selected_txs(&self) -> Vec<Vec<u8>>;

    /// Number of transactions selected so far
    fn selected_len(&self) -> usize {
        self.selected_txs().len()
    }

    /// Reset all running state
    fn clear(&mut self);

    /// Try to admit one transaction.
    ///
    /// `declared_gas` is `None` for transactions that could not be decoded;
    /// such transactions are only byte-accounted.
    ///
    /// Returns `true` when the caller must stop offering candidates.
    fn select_tx_for_proposal(
        &mut self,
        max_tx_bytes: u64,
        max_block_gas: u64,
        declared_gas: Option<u64>,
        tx_bytes: Vec<u8>,
    ) -> bool;
}

/// Greedy prefix selector
///
/// Admits a candidate iff it fits both budgets and signals halt as soon as
/// either budget is exhausted.
#[derive(Debug, Default)]
pub struct DefaultTxSelector {
    total_tx_bytes: u64,
    total_tx_gas: u64,
    selected_txs: Vec<Vec<u8>>,
}

impl DefaultTxSelector {
    /// Create an empty selector
    pub fn new() -> Self {
        Self::default()
    }

    /// Running total of selected bytes
    pub fn total_tx_bytes(&self) -> u64 {
        self.total_tx_bytes
    }

    /// Running total of selected gas
    pub fn total_tx_gas(&self) -> u64 {
        self.total_tx_gas
    }
}

impl TxSelector for DefaultTxSelector {
    fn selected_txs(&self) -> Vec<Vec<u8>> {
        self.selected_txs.clone()
    }

    fn selected_len(&self) -> usize {
        self.selected_txs.len()
    }

    fn clear(&mut self) {
        self.total_tx_bytes = 0;
        self.total_tx_gas = 0;
        self.selected_txs = Vec::new();
    }

    fn select_tx_for_proposal(
        &mut self,
        max_tx_bytes: u64,
        max_block_gas: u64,
        declared_gas: Option<u64>,
        tx_bytes: Vec<u8>,
    ) -> bool {
        if max_tx_bytes == 0 {
            return true;
        }

        let tx_size = tx_bytes.len() as u64;
        let tx_gas = declared_gas.unwrap_or(0);

        let fits_bytes = self
            .total_tx_bytes
            .checked_add(tx_size)
            .is_some_and(|total| total <= max_tx_bytes);
        let fits_gas = max_block_gas == 0
            || self
                .total_tx_gas
                .checked_add(tx_gas)
                .is_some_and(|total| total <= max_block_gas);

        if fits_bytes && fits_gas {
            self.total_tx_bytes += tx_size;
            // Gas is only accounted while a gas budget is in force.
            if max_block_gas > 0 {
                self.total_tx_gas += tx_gas;
            }
            self.selected_txs.push(tx_bytes);
        }

        self.total_tx_bytes >= max_tx_bytes
            || (max_block_gas > 0 && self.total_tx_gas >= max_block_gas)
    }
}
