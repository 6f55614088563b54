//! # QC-17 Proposal Handler Brutal Benchmarks
//!
//! Hot paths:
//! - Proposal build from a large pool under byte and gas budgets
//! - Proposal validation of a full block
//! - Single-signer sequence chains
//!
//! Brutal Conditions:
//! - 10,000 pooled transactions
//! - Mixed valid/invalid pools
//! - Randomised gas declarations

use criterion::{black_box, BenchmarkId, Criterion, Throughput};
use qc_17_proposal_handler::{
    BincodeTxCodec, CodecTxVerifier, ConsensusParams, DefaultProposalHandler, InMemoryTxPool,
    PrepareRequest, ProcessRequest, ProposalTx, SignerSequence, TxSourceMode, WireTx,
};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

const MAX_TX_BYTES: u64 = 1024 * 1024;
const MAX_BLOCK_GAS: i64 = 30_000_000;

/// Generate `count` transactions spread over `signers` accounts
fn generate_txs(count: usize, signers: usize) -> Vec<ProposalTx> {
    let mut rng = rand::thread_rng();
    let mut sequences = vec![0u64; signers];

    (0..count)
        .map(|i| {
            let who = i % signers;
            sequences[who] += 1;
            let mut address = [0u8; 20];
            address[..8].copy_from_slice(&(who as u64).to_le_bytes());
            let payload: Vec<u8> = (0..rng.gen_range(64..256)).map(|_| rng.gen()).collect();
            BincodeTxCodec::to_proposal_tx(&WireTx::new(
                SignerSequence::new(address, sequences[who]),
                rng.gen_range(21_000..100_000),
                payload,
            ))
            .expect("encode")
        })
        .collect()
}

fn handler_with_pool(txs: &[ProposalTx]) -> (Arc<CodecTxVerifier>, DefaultProposalHandler) {
    let pool = Arc::new(InMemoryTxPool::new());
    for tx in txs {
        pool.insert(tx.clone()).expect("insert");
    }
    let verifier = Arc::new(CodecTxVerifier::new());
    let handler = DefaultProposalHandler::new(TxSourceMode::Ranked(pool), verifier.clone());
    (verifier, handler)
}

fn request() -> PrepareRequest {
    PrepareRequest {
        height: 1,
        txs: vec![],
        max_tx_bytes: MAX_TX_BYTES,
    }
}

pub fn brutal_build_proposal(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-17-build-proposal");
    group.measurement_time(Duration::from_secs(10));
    let params = ConsensusParams::with_max_gas(MAX_BLOCK_GAS);

    for pool_size in [100, 1_000, 10_000] {
        let txs = generate_txs(pool_size, 64);
        let (_verifier, handler) = handler_with_pool(&txs);

        group.throughput(Throughput::Elements(pool_size as u64));
        group.bench_with_input(
            BenchmarkId::new("pool", pool_size),
            &pool_size,
            |b, _| b.iter(|| black_box(handler.build_proposal(&params, request()).expect("build"))),
        );
    }

    group.finish();
}

pub fn brutal_build_with_invalid_txs(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-17-build-invalid-mix");
    let params = ConsensusParams::with_max_gas(MAX_BLOCK_GAS);
    let txs = generate_txs(1_000, 1_000);

    group.bench_function("ten_percent_denied", |b| {
        b.iter_batched(
            || {
                // Removal is permanent, so every iteration needs a fresh pool.
                let (verifier, handler) = handler_with_pool(&txs);
                for tx in txs.iter().step_by(10) {
                    verifier.deny(tx.hash());
                }
                handler
            },
            |handler| black_box(handler.build_proposal(&params, request()).expect("build")),
            criterion::BatchSize::SmallInput,
        )
    });

    group.finish();
}

pub fn brutal_sequence_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-17-sequence-chain");
    let params = ConsensusParams::with_max_gas(0);
    let txs = generate_txs(2_000, 1);
    let (_verifier, handler) = handler_with_pool(&txs);

    group.bench_function("single_signer_2000", |b| {
        b.iter(|| black_box(handler.build_proposal(&params, request()).expect("build")))
    });

    group.finish();
}

pub fn brutal_validate_proposal(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-17-validate-proposal");
    let params = ConsensusParams::with_max_gas(MAX_BLOCK_GAS);
    let txs = generate_txs(5_000, 128);
    let (_verifier, handler) = handler_with_pool(&txs);
    let proposal = ProcessRequest {
        height: 1,
        txs: handler.build_proposal(&params, request()).expect("build").txs,
    };

    group.throughput(Throughput::Elements(proposal.txs.len() as u64));
    group.bench_function("full_block", |b| {
        b.iter(|| black_box(handler.validate_proposal(&params, &proposal).is_ok()))
    });

    group.finish();
}

pub fn register_benchmarks(c: &mut Criterion) {
    brutal_build_proposal(c);
    brutal_build_with_invalid_txs(c);
    brutal_sequence_chain(c);
    brutal_validate_proposal(c);
}
