//! Common test utilities and fixtures for integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use ballot_relay::infra::SnapshotFile;
use ballot_relay::projection::QueryService;
use ballot_relay::server::AppState;
use ballot_relay::{
    BallotMode, Candidate, CandidateStanding, RelayError, RemoteBallot, VerifiedIdentityStore,
    VoteEvent, VoteLedger, VoteReceipt, VoteService,
};

/// The candidate set used across the test suite.
pub fn test_candidates() -> Vec<Candidate> {
    vec![
        Candidate::new(0, "Alice"),
        Candidate::new(1, "Bob"),
        Candidate::new(2, "Charlie"),
    ]
}

pub fn vote_event(voter: &str, candidate_id: u64, transaction_hash: &str) -> VoteEvent {
    VoteEvent {
        voter: voter.to_string(),
        candidate_id,
        transaction_hash: transaction_hash.to_string(),
    }
}

/// Remote ballot stub that accepts every vote with a fresh transaction
/// hash, or rejects each one with a fixed message.
pub struct StubBallot {
    reject_with: Option<String>,
    standings: Vec<CandidateStanding>,
    sequence: AtomicU64,
}

impl StubBallot {
    pub fn accepting() -> Self {
        Self {
            reject_with: None,
            standings: Vec::new(),
            sequence: AtomicU64::new(0),
        }
    }

    pub fn rejecting(message: &str) -> Self {
        Self {
            reject_with: Some(message.to_string()),
            standings: Vec::new(),
            sequence: AtomicU64::new(0),
        }
    }

    pub fn with_standings(mut self, standings: Vec<CandidateStanding>) -> Self {
        self.standings = standings;
        self
    }
}

#[async_trait]
impl RemoteBallot for StubBallot {
    async fn submit_vote(&self, _candidate_id: u64) -> ballot_relay::Result<VoteReceipt> {
        if let Some(message) = &self.reject_with {
            return Err(RelayError::RemoteCall(message.clone()));
        }
        let n = self.sequence.fetch_add(1, Ordering::SeqCst);
        Ok(VoteReceipt {
            voter: "0xrelaysigner".to_string(),
            transaction_hash: format!("0xstub{n:04x}"),
        })
    }

    async fn fetch_candidates(&self) -> ballot_relay::Result<Vec<CandidateStanding>> {
        Ok(self.standings.clone())
    }

    async fn fetch_votes(&self, from_block: u64) -> ballot_relay::Result<(Vec<VoteEvent>, u64)> {
        Ok((Vec::new(), from_block))
    }
}

/// Build application state over a temp directory in the given mode.
pub fn test_state(dir: &tempfile::TempDir, mode: BallotMode) -> AppState {
    let ledger = Arc::new(VoteLedger::open(SnapshotFile::new(
        dir.path().join("votes.json"),
    )));
    let identities = Arc::new(VerifiedIdentityStore::open(SnapshotFile::new(
        dir.path().join("verified-voters.json"),
    )));

    AppState {
        votes: Arc::new(VoteService::new(
            mode.clone(),
            ledger.clone(),
            test_candidates(),
        )),
        query: Arc::new(QueryService::new(ledger.clone(), test_candidates())),
        identities,
        ledger,
        mode,
    }
}

pub fn connected(remote: impl RemoteBallot + 'static) -> BallotMode {
    BallotMode::Connected(Arc::new(remote))
}
