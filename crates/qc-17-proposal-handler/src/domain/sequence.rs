//! Per-signer sequence ordering within one proposal
//!
//! The tracker remembers, for every signer seen in the current build, the
//! last sequence admitted into the proposal. A later transaction from that
//! signer is only admissible with exactly the next sequence. The tracker is
//! unrelated to the on-chain account sequence, which the verifier checks.

use super::entities::{Address, SignerSequence};
use std::collections::HashMap;
use std::fmt;

/// A candidate's sequence does not follow the signer's last admitted one
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SequenceViolation {
    /// Offending signer
    pub signer: Address,
    /// Sequence that would have been admissible
    pub expected: u64,
    /// Sequence carried by the candidate
    pub actual: u64,
}

impl fmt::Display for SequenceViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "signer {} expected sequence {}, got {}",
            hex::encode(self.signer),
            self.expected,
            self.actual
        )
    }
}

/// Signer/sequence pairs of a candidate that passed the ordering check
///
/// Holds at most one pair per signer, in first-seen order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PendingSequences {
    pairs: Vec<SignerSequence>,
}

impl PendingSequences {
    fn record(&mut self, pair: SignerSequence) {
        match self.pairs.iter_mut().find(|p| p.signer == pair.signer) {
            Some(existing) => existing.sequence = pair.sequence,
            None => self.pairs.push(pair),
        }
    }

    /// Pending pairs
    pub fn pairs(&self) -> &[SignerSequence] {
        &self.pairs
    }
}

/// Tracks the last admitted sequence per signer for one build
#[derive(Debug, Default)]
pub struct SignerSequenceTracker {
    selected: HashMap<Address, u64>,
}

impl SignerSequenceTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Check a candidate's pairs against the admitted sequences.
    ///
    /// First appearances of a signer are always acceptable; a known signer
    /// must carry exactly `last + 1`.
    pub fn check(&self, pairs: &[SignerSequence]) -> Result<PendingSequences, SequenceViolation> {
        let mut pending = PendingSequences::default();

        for pair in pairs {
            if let Some(&last) = self.selected.get(&pair.signer) {
                let expected = last.checked_add(1);
                if expected != Some(pair.sequence) {
                    return Err(SequenceViolation {
                        signer: pair.signer,
                        expected: expected.unwrap_or(u64::MAX),
                        actual: pair.sequence,
                    });
                }
            }
            pending.record(*pair);
        }

        Ok(pending)
    }

    /// Record the pairs of a transaction admitted into the proposal
    pub fn commit(&mut self, pending: &PendingSequences) {
        for pair in &pending.pairs {
            self.selected.insert(pair.signer, pair.sequence);
        }
    }

    /// Record a verified transaction that the selector did not admit.
    ///
    /// For signers not seen yet, the preceding sequence is recorded so that
    /// only a transaction carrying this same sequence can follow. Nothing
    /// is recorded for sequence 0, which has no predecessor.
    pub fn note_verified(&mut self, pending: &PendingSequences) {
        for pair in &pending.pairs {
            if self.selected.contains_key(&pair.signer) {
                continue;
            }
            if let Some(previous) = pair.sequence.checked_sub(1) {
                self.selected.insert(pair.signer, previous);
            }
        }
    }

    /// Last recorded sequence for a signer
    pub fn last_sequence(&self, signer: &Address) -> Option<u64> {
        self.selected.get(signer).copied()
    }

    /// Number of signers tracked
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Whether no signer has been recorded
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}
