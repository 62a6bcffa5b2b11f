//! Error types for the ballot relay infrastructure

use thiserror::Error;

/// Errors that can occur while relaying votes and verifications
#[derive(Error, Debug)]
pub enum RelayError {
    /// Vote for a candidate id not in the registered set
    #[error("unknown candidate id: {0}")]
    UnknownCandidate(u64),

    /// Address already has a recorded vote, detected locally or normalized
    /// from a remote rejection
    #[error("address {0} has already cast a vote")]
    DuplicateVote(String),

    /// Verification bundle without a nullifier hash
    #[error("verification proof is missing a nullifier hash")]
    MissingNullifier,

    /// Remote ledger could not be reached or probed at startup
    #[error("remote ledger unavailable: {0}")]
    RemoteUnavailable(String),

    /// A submission or query against a reachable remote ledger failed
    #[error("remote ledger call failed: {0}")]
    RemoteCall(String),

    /// Snapshot file error
    #[error("snapshot io error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot encoding error
    #[error("snapshot encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for relay operations
pub type Result<T> = std::result::Result<T, RelayError>;
