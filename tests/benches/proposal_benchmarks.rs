//! # Quantum-Chain Proposal Handler Benchmarks
//!
//! | Path | Target |
//! |------|--------|
//! | Build from 10,000 pooled txs | < 50ms |
//! | Validate a full block | < 20ms |

use criterion::{criterion_group, criterion_main, Criterion};
use qc_tests::benchmarks::qc_17_proposal_handler;

fn proposal_benches(c: &mut Criterion) {
    qc_17_proposal_handler::register_benchmarks(c);
}

criterion_group!(benches, proposal_benches);
criterion_main!(benches);
