//! Error types for the ledger
//!
//! Each concern gets its own enum so callers can match on the exact
//! sub-reason. `LedgerError` is the umbrella returned by the service.

use super::{BlockHash, DelegateId, VoterId};

/// Block validation and append failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainError {
    #[error("Invalid linkage at position {position}: expected previous hash {expected}, got {actual}")]
    InvalidLinkage {
        position: u64,
        expected: BlockHash,
        actual: BlockHash,
    },

    #[error("Invalid position: expected {expected}, got {actual}")]
    InvalidPosition { expected: u64, actual: u64 },

    #[error("Hash mismatch at position {position}: stored {stored}, recomputed {recomputed}")]
    HashMismatch {
        position: u64,
        stored: BlockHash,
        recomputed: BlockHash,
    },

    #[error("Timestamp regression at position {position}: {actual} is before predecessor's {previous}")]
    TimestampRegression {
        position: u64,
        previous: u64,
        actual: u64,
    },

    #[error("Genesis block is malformed: {0}")]
    InvalidGenesis(String),

    #[error("Genesis marker is reserved for block 0, found at position {position}")]
    ReservedGenesisMarker { position: u64 },

    #[error("Unauthorized proposer: expected {expected}, got {submitted:?}")]
    UnauthorizedProposer {
        expected: DelegateId,
        submitted: Option<DelegateId>,
    },
}

impl ChainError {
    /// A concurrent append moved the tail; rebuild against the new tail and retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ChainError::InvalidLinkage { .. } | ChainError::InvalidPosition { .. }
        )
    }

    /// Stored or submitted data does not match its own digest. Ingestion should halt.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            ChainError::HashMismatch { .. }
                | ChainError::TimestampRegression { .. }
                | ChainError::InvalidGenesis(_)
        )
    }

    /// Short label used for metrics and logs
    pub fn reason(&self) -> &'static str {
        match self {
            ChainError::InvalidLinkage { .. } => "invalid_linkage",
            ChainError::InvalidPosition { .. } => "invalid_position",
            ChainError::HashMismatch { .. } => "hash_mismatch",
            ChainError::TimestampRegression { .. } => "timestamp_regression",
            ChainError::InvalidGenesis(_) => "invalid_genesis",
            ChainError::ReservedGenesisMarker { .. } => "reserved_genesis_marker",
            ChainError::UnauthorizedProposer { .. } => "unauthorized_proposer",
        }
    }
}

/// Vote accounting and registration failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VotingError {
    #[error("Unknown voter: {0}")]
    UnknownVoter(VoterId),

    #[error("Unknown delegate: {0}")]
    UnknownDelegate(DelegateId),

    #[error("Voter {0} has no active vote")]
    NoActiveVote(VoterId),

    #[error("Voter already registered: {0}")]
    DuplicateVoter(VoterId),

    #[error("Delegate already registered: {0}")]
    DuplicateDelegate(DelegateId),
}

/// Proposer rotation failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RotationError {
    /// No committee has been elected, or the last election was empty.
    /// Run an election before retrying.
    #[error("No active delegates in rotation")]
    NoActiveDelegates,
}

/// Invalid ledger configuration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Committee size must be at least 1")]
    ZeroCommitteeSize,
}

/// Any failure surfaced by the ledger service
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error(transparent)]
    Voting(#[from] VotingError),

    #[error(transparent)]
    Rotation(#[from] RotationError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
