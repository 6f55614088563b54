//! Error types for the proposal handler subsystem
//!
//! Three layers of failure exist:
//! - [`TxVerifyError`]: one transaction is invalid. Recoverable by exclusion
//!   on the build path, terminal for the whole proposal on the validate path.
//! - [`SourceError`]: the transaction source could not drop a transaction.
//! - [`ProposalError`]: the current cycle cannot continue.

use thiserror::Error;

/// Result type alias for proposal handler operations
pub type Result<T> = std::result::Result<T, ProposalError>;

/// Errors that abort a whole prepare/process cycle
#[derive(Debug, Error)]
pub enum ProposalError {
    /// A ranked-source transaction exposed no signer data
    #[error("Transaction {tx_hash} from the ranked source has no signer data")]
    MissingSignerData {
        /// Hex-encoded transaction hash
        tx_hash: String,
    },

    /// The source failed to remove a permanently invalid transaction
    #[error("Failed to remove transaction {tx_hash} from source: {source}")]
    SourceRemoval {
        /// Hex-encoded transaction hash
        tx_hash: String,
        /// Underlying source error
        #[source]
        source: SourceError,
    },

    /// A built proposal broke a selection invariant
    #[error("Selection invariant violated: {0}")]
    InvariantViolation(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Tracing subscriber could not be installed
    #[error("Telemetry error: {0}")]
    Telemetry(String),
}

impl ProposalError {
    /// Check if error is critical (handler should not be reused without intervention)
    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfig(_) | Self::InvariantViolation(_)
        )
    }
}

/// Reasons a single transaction fails verification
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TxVerifyError {
    /// Bytes could not be decoded into a transaction
    #[error("Decode failed: {0}")]
    Decode(String),

    /// Transaction could not be re-encoded
    #[error("Encode failed: {0}")]
    Encode(String),

    /// Signature check failed
    #[error("Invalid signature")]
    InvalidSignature,

    /// Stateful validity check rejected the transaction
    #[error("Rejected by validity checks: {0}")]
    Rejected(String),
}

/// Errors reported by a transaction source
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SourceError {
    /// Transaction is not (or no longer) in the source
    #[error("Transaction not found")]
    TxNotFound,

    /// Any other source failure
    #[error("Source error: {0}")]
    Other(String),
}

/// Errors that can occur during config loading
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read {path}: {error}")]
    Io {
        /// Path that could not be read
        path: String,
        /// I/O error message
        error: String,
    },

    /// TOML parsing error
    #[error("Failed to parse config: {0}")]
    Parse(String),

    /// Environment override had an unusable value
    #[error("Invalid value for {key}: {value}")]
    InvalidEnv {
        /// Environment variable name
        key: String,
        /// Offending value
        value: String,
    },
}

impl From<ConfigError> for ProposalError {
    fn from(err: ConfigError) -> Self {
        Self::InvalidConfig(err.to_string())
    }
}
