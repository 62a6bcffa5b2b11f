//! Trait definitions for the remote ledger boundary

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::domain::{CandidateStanding, VoteEvent, VoteReceipt};

use super::Result;

/// The authoritative external ballot: submit votes, read the candidate
/// registry, and replay vote events.
///
/// Invariant: the remote ledger, not this process, is the authority on
/// vote uniqueness. Everything local is a mirror.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RemoteBallot: Send + Sync {
    /// Submit a vote transaction and wait for its receipt.
    ///
    /// The implementation resolves the signing account and transaction cost
    /// itself; callers only name the candidate.
    async fn submit_vote(&self, candidate_id: u64) -> Result<VoteReceipt>;

    /// Read the candidate registry together with on-chain vote counts.
    async fn fetch_candidates(&self) -> Result<Vec<CandidateStanding>>;

    /// Fetch all vote events from `from_block` to the present.
    ///
    /// Returns the events and the next block cursor to resume from.
    async fn fetch_votes(&self, from_block: u64) -> Result<(Vec<VoteEvent>, u64)>;
}
