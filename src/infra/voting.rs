//! Vote submission orchestration
//!
//! Validates the candidate, applies the advisory duplicate gate, submits to
//! the remote ledger, and records the result. When the process started
//! without a ledger connection, submissions are acknowledged synthetically
//! and nothing is recorded.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{Candidate, SubmitOutcome, VoteRecord};

use super::{RelayError, RemoteBallot, Result, VoteLedger};

/// Ledger connectivity, decided once at startup and never retried.
#[derive(Clone)]
pub enum BallotMode {
    /// The ballot contract is reachable and votes go on chain.
    Connected(Arc<dyn RemoteBallot>),
    /// No ledger connection; votes are simulated for demo use.
    Simulated,
}

impl BallotMode {
    pub fn is_simulated(&self) -> bool {
        matches!(self, BallotMode::Simulated)
    }

    pub fn remote(&self) -> Option<&Arc<dyn RemoteBallot>> {
        match self {
            BallotMode::Connected(remote) => Some(remote),
            BallotMode::Simulated => None,
        }
    }
}

/// Orchestrates a single vote submission end to end.
pub struct VoteService {
    mode: BallotMode,
    ledger: Arc<VoteLedger>,
    candidates: Vec<Candidate>,
}

impl VoteService {
    pub fn new(mode: BallotMode, ledger: Arc<VoteLedger>, candidates: Vec<Candidate>) -> Self {
        Self {
            mode,
            ledger,
            candidates,
        }
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Submit a vote for `candidate_id` on behalf of `voter_address`.
    ///
    /// The duplicate gate and the remote submission are two separate steps:
    /// concurrent submissions for one address can both pass the gate, and
    /// the contract's own uniqueness rule is the final authority. The gate
    /// exists to answer cheaply and locally in the common case.
    pub async fn submit_vote(
        &self,
        candidate_id: u64,
        voter_address: &str,
    ) -> Result<SubmitOutcome> {
        if !self.candidates.iter().any(|c| c.id == candidate_id) {
            return Err(RelayError::UnknownCandidate(candidate_id));
        }

        let remote = match &self.mode {
            BallotMode::Connected(remote) => remote,
            BallotMode::Simulated => {
                info!("no ledger connection, simulating vote for candidate {candidate_id}");
                return Ok(SubmitOutcome::Simulated { candidate_id });
            }
        };

        if self.ledger.has_voted(voter_address).await {
            return Err(RelayError::DuplicateVote(voter_address.to_string()));
        }

        let receipt = match remote.submit_vote(candidate_id).await {
            Ok(receipt) => receipt,
            Err(e) => {
                warn!("vote submission failed: {e}");
                return Err(classify_remote_failure(voter_address, e));
            }
        };

        info!(
            "vote for candidate {} mined in transaction {} (signer {})",
            candidate_id, receipt.transaction_hash, receipt.voter
        );

        let record = VoteRecord::new(voter_address, candidate_id, receipt.transaction_hash.clone());
        self.ledger.append(record).await;

        Ok(SubmitOutcome::Submitted {
            transaction_hash: receipt.transaction_hash,
        })
    }
}

/// Fold contract-side duplicate rejections into the same error the local
/// gate produces, so clients see one duplicate-vote shape either way.
fn classify_remote_failure(voter_address: &str, err: RelayError) -> RelayError {
    let message = err.to_string().to_ascii_lowercase();
    if message.contains("already voted") || message.contains("already cast a vote") {
        return RelayError::DuplicateVote(voter_address.to_string());
    }
    err
}
