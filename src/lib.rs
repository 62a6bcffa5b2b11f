//! Ballot Relay Library
//!
//! HTTP relay for an on-chain ballot: accepts vote submissions, mirrors the
//! contract's vote history into a durable local ledger, guards identity
//! verifications against nullifier replay, and serves candidate tallies.
//!
//! ## Modules
//!
//! - [`domain`] - Core domain types (votes, candidates, identities)
//! - [`infra`] - Ledger cache, identity store, snapshots, vote service
//! - [`chain`] - Ballot contract client and event watcher
//! - [`projection`] - Read models over the ledger
//! - [`api`] - REST API routes
//! - [`server`] - Configuration and HTTP bootstrap

pub mod api;
pub mod chain;
pub mod domain;
pub mod infra;
pub mod projection;
pub mod server;

// Re-export commonly used types
pub use domain::{
    Candidate, CandidateStanding, RedeemOutcome, SubmitOutcome, VerificationProof,
    VerifiedIdentity, VoteEvent, VoteReceipt, VoteRecord,
};

pub use infra::{
    BallotMode, RelayError, RemoteBallot, Result, SnapshotFile, VerifiedIdentityStore, VoteLedger,
    VoteService,
};
