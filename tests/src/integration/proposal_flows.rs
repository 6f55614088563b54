//! # Proposal Flow Tests
//!
//! A builder node and a validator node, each with its own handler and
//! verifier, exchanging proposals through the public API.
//!
//! ## Flows Tested:
//!
//! 1. **Build → Validate**: pool-backed proposals are accepted by a peer
//! 2. **Exclusion**: invalid transactions leave the pool and the proposal
//! 3. **Tampering**: altered proposals are rejected by the peer
//! 4. **Configuration**: TOML-driven no-op mode

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use qc_17_proposal_handler::{
        BincodeTxCodec, CodecTxVerifier, ConsensusParams, DefaultProposalHandler, InMemoryTxPool,
        NoOpProposalHandler, PrepareRequest, ProcessRequest, ProposalHandler,
        ProposalHandlerConfig, ProposalStatus, ProposalTx, SignerSequence, TransactionSource,
        TxSourceMode, WireTx,
    };

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    const HEIGHT: u64 = 42;

    fn signer(id: u8) -> [u8; 20] {
        [id; 20]
    }

    /// Encoded single-signer transaction with a small payload
    fn make_tx(id: u8, sequence: u64, gas: u64) -> ProposalTx {
        BincodeTxCodec::to_proposal_tx(&WireTx::new(
            SignerSequence::new(signer(id), sequence),
            gas,
            vec![id; 32],
        ))
        .unwrap()
    }

    /// Builder node: pool + verifier + handler
    fn builder_node(
        txs: Vec<ProposalTx>,
    ) -> (Arc<InMemoryTxPool>, Arc<CodecTxVerifier>, DefaultProposalHandler) {
        let pool = Arc::new(InMemoryTxPool::new());
        for tx in txs {
            pool.insert(tx).unwrap();
        }
        let verifier = Arc::new(CodecTxVerifier::new());
        let handler =
            DefaultProposalHandler::new(TxSourceMode::Ranked(pool.clone()), verifier.clone());
        (pool, verifier, handler)
    }

    /// Validator node with an empty pool of its own
    fn validator_node() -> DefaultProposalHandler {
        DefaultProposalHandler::new(
            TxSourceMode::Ranked(Arc::new(InMemoryTxPool::new())),
            Arc::new(CodecTxVerifier::new()),
        )
    }

    fn prepare_request(max_tx_bytes: u64) -> PrepareRequest {
        PrepareRequest {
            height: HEIGHT,
            txs: vec![],
            max_tx_bytes,
        }
    }

    // =============================================================================
    // INTEGRATION TESTS: BUILD → VALIDATE
    // =============================================================================

    #[tokio::test]
    async fn test_peer_accepts_built_proposal() {
        let txs = (1..=4u8)
            .flat_map(|id| (1..=3u64).map(move |seq| make_tx(id, seq, 250)))
            .collect();
        let (_pool, _verifier, builder) = builder_node(txs);
        let validator = validator_node();
        let params = ConsensusParams::with_max_gas(2_000);

        let proposal = builder
            .prepare_proposal(&params, prepare_request(100_000))
            .await
            .unwrap();
        assert_eq!(proposal.txs.len(), 8);

        let verdict = validator
            .process_proposal(
                &params,
                ProcessRequest {
                    height: HEIGHT,
                    txs: proposal.txs,
                },
            )
            .await
            .unwrap();
        assert_eq!(verdict.status, ProposalStatus::Accept);
    }

    #[tokio::test]
    async fn test_invalid_tx_evicted_from_pool() {
        let good = make_tx(1, 1, 100);
        let bad = make_tx(2, 1, 100);
        let (pool, verifier, builder) = builder_node(vec![good.clone(), bad.clone()]);
        verifier.deny(bad.hash());
        let params = ConsensusParams::with_max_gas(1_000);

        let first = builder
            .prepare_proposal(&params, prepare_request(10_000))
            .await
            .unwrap();
        assert_eq!(first.txs, vec![good.bytes.clone()]);
        assert!(!pool.contains(&bad.hash()));
        assert_eq!(pool.len(), 1);

        // Allowing it again has no effect once it has left the pool.
        verifier.allow(&bad.hash());
        let second = builder
            .prepare_proposal(&params, prepare_request(10_000))
            .await
            .unwrap();
        assert_eq!(second.txs, vec![good.bytes]);
        assert_eq!(builder.metrics().get_transactions_removed(), 1);
    }

    #[tokio::test]
    async fn test_tampered_proposal_rejected() {
        let (_pool, _verifier, builder) =
            builder_node(vec![make_tx(1, 1, 100), make_tx(2, 1, 100)]);
        let validator = validator_node();
        let params = ConsensusParams::with_max_gas(1_000);

        let mut proposal = builder
            .prepare_proposal(&params, prepare_request(10_000))
            .await
            .unwrap();
        proposal.txs[1].push(0x00);

        let verdict = validator
            .process_proposal(
                &params,
                ProcessRequest {
                    height: HEIGHT,
                    txs: proposal.txs,
                },
            )
            .await
            .unwrap();
        assert!(!verdict.is_accepted());
        assert_eq!(validator.metrics().get_proposals_rejected(), 1);
    }

    #[tokio::test]
    async fn test_peer_with_lower_gas_budget_rejects() {
        let (_pool, _verifier, builder) =
            builder_node(vec![make_tx(1, 1, 600), make_tx(2, 1, 600)]);
        let validator = validator_node();

        let proposal = builder
            .prepare_proposal(&ConsensusParams::with_max_gas(0), prepare_request(10_000))
            .await
            .unwrap();
        assert_eq!(proposal.txs.len(), 2);

        let verdict = validator
            .process_proposal(
                &ConsensusParams::with_max_gas(1_000),
                ProcessRequest {
                    height: HEIGHT,
                    txs: proposal.txs,
                },
            )
            .await
            .unwrap();
        assert_eq!(verdict.status, ProposalStatus::Reject);
    }

    #[tokio::test]
    async fn test_concurrent_builds_share_handler() {
        let txs = (1..=10u8).map(|id| make_tx(id, 1, 10)).collect();
        let (_pool, _verifier, builder) = builder_node(txs);
        let builder = Arc::new(builder);
        let params = ConsensusParams::with_max_gas(50);

        let mut handles = Vec::new();
        for _ in 0..8 {
            let builder = builder.clone();
            handles.push(tokio::spawn(async move {
                builder
                    .prepare_proposal(&params, prepare_request(10_000))
                    .await
                    .unwrap()
            }));
        }

        let mut proposals = Vec::new();
        for handle in handles {
            proposals.push(handle.await.unwrap());
        }

        assert!(proposals.iter().all(|p| p.txs.len() == 5));
        assert!(proposals.windows(2).all(|w| w[0] == w[1]));
    }

    // =============================================================================
    // INTEGRATION TESTS: CONFIGURATION
    // =============================================================================

    #[tokio::test]
    async fn test_noop_mode_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("proposal.toml");
        std::fs::write(&path, "noop_source = true\n").unwrap();
        let config = ProposalHandlerConfig::load(&path).unwrap();

        let pool: Arc<dyn TransactionSource> = Arc::new(InMemoryTxPool::new());
        let handler =
            DefaultProposalHandler::from_config(config, Some(pool), Arc::new(CodecTxVerifier::new()));
        let candidates = vec![vec![0xAB; 30], vec![0xCD; 30], vec![0xEF; 30]];

        let proposal = handler
            .prepare_proposal(
                &ConsensusParams::default(),
                PrepareRequest {
                    height: HEIGHT,
                    txs: candidates.clone(),
                    max_tx_bytes: 60,
                },
            )
            .await
            .unwrap();
        assert_eq!(proposal.txs, candidates[..2].to_vec());
    }

    #[tokio::test]
    async fn test_handlers_behind_trait_object() {
        let handlers: Vec<Box<dyn ProposalHandler>> =
            vec![Box::new(NoOpProposalHandler), Box::new(validator_node())];
        let garbage = ProcessRequest {
            height: HEIGHT,
            txs: vec![b"not a transaction".to_vec()],
        };

        let mut verdicts = Vec::new();
        for handler in &handlers {
            let verdict = handler
                .process_proposal(&ConsensusParams::default(), garbage.clone())
                .await
                .unwrap();
            verdicts.push(verdict.status);
        }

        assert_eq!(verdicts, vec![ProposalStatus::Accept, ProposalStatus::Reject]);
    }
}
