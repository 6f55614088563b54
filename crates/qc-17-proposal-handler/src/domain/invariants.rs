//! Invariant checkers for built proposals
//!
//! These functions re-check a finished selection against the rules the
//! selector and sequence tracker enforce incrementally. They are run after
//! a build when `verify_selected_invariants` is enabled, and by tests.

use super::entities::{Address, ProposalTx};
use crate::error::{ProposalError, Result};
use std::collections::HashMap;

/// INVARIANT-1: Byte Budget
/// The encoded size of all selected transactions MUST NOT exceed max_tx_bytes.
pub fn check_byte_budget(txs: &[Vec<u8>], max_tx_bytes: u64) -> Result<()> {
    let total = txs
        .iter()
        .try_fold(0u64, |acc, tx| acc.checked_add(tx.len() as u64));

    match total {
        Some(total) if total <= max_tx_bytes => Ok(()),
        Some(total) => Err(ProposalError::InvariantViolation(format!(
            "selected {} bytes, budget {}",
            total, max_tx_bytes
        ))),
        None => Err(ProposalError::InvariantViolation(
            "selected bytes overflow".to_string(),
        )),
    }
}

/// INVARIANT-2: Gas Budget
/// With a positive block gas budget, the declared gas of selected
/// transactions MUST NOT exceed it. A zero budget is unlimited.
pub fn check_gas_budget(txs: &[ProposalTx], max_block_gas: u64) -> Result<()> {
    if max_block_gas == 0 {
        return Ok(());
    }

    let mut total = 0u64;
    for tx in txs {
        total = total
            .checked_add(tx.declared_gas.unwrap_or(0))
            .ok_or_else(|| ProposalError::InvariantViolation("selected gas overflow".into()))?;
    }

    if total > max_block_gas {
        return Err(ProposalError::InvariantViolation(format!(
            "selected {} gas, budget {}",
            total, max_block_gas
        )));
    }
    Ok(())
}

/// INVARIANT-3: Sequence Law
/// In admission order, each signer's sequences MUST increase by exactly 1.
pub fn check_signer_sequences(txs: &[ProposalTx]) -> Result<()> {
    let mut last: HashMap<Address, u64> = HashMap::new();

    for (index, tx) in txs.iter().enumerate() {
        for pair in tx.signer_sequences.iter().flatten() {
            if let Some(&previous) = last.get(&pair.signer) {
                if previous.checked_add(1) != Some(pair.sequence) {
                    return Err(ProposalError::InvariantViolation(format!(
                        "tx {} breaks sequence order: {} after {}",
                        index, pair, previous
                    )));
                }
            }
        }
        // Pairs are applied after the whole tx is checked, matching the tracker.
        for pair in tx.signer_sequences.iter().flatten() {
            last.insert(pair.signer, pair.sequence);
        }
    }

    Ok(())
}
