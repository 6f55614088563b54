//! Inbound ports (driving side - API)

use crate::domain::{
    ConsensusParams, PrepareRequest, PrepareResponse, ProcessRequest, ProcessResponse,
};
use crate::error::Result;
use async_trait::async_trait;

/// Primary port: proposal construction and validation, driven by the
/// consensus engine once per height.
#[async_trait]
pub trait ProposalHandler: Send + Sync {
    /// Build the list of transactions to propose.
    ///
    /// An `Err` means the cycle hit an internal invariant break; the caller
    /// decides whether to propose an empty block or halt.
    async fn prepare_proposal(
        &self,
        params: &ConsensusParams,
        request: PrepareRequest,
    ) -> Result<PrepareResponse>;

    /// Decide whether a received proposal is acceptable.
    async fn process_proposal(
        &self,
        params: &ConsensusParams,
        request: ProcessRequest,
    ) -> Result<ProcessResponse>;
}
