//! Vote records, candidates, and submission outcomes
//!
//! A `VoteRecord` is written exactly once per accepted vote and never
//! mutated or deleted. The chain-assigned transaction hash is the identity
//! key; the voter address is a case-insensitive comparison key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single vote as mirrored in the local ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    /// Voter address (compared case-insensitively)
    pub voter: String,

    /// Candidate the vote was cast for
    pub candidate_id: u64,

    /// Transaction hash assigned by the remote ledger; unique per record
    pub transaction_hash: String,

    /// When this record was observed (submission time for local votes,
    /// event-observation time for reconciled votes)
    pub timestamp: DateTime<Utc>,
}

impl VoteRecord {
    /// Create a record observed now.
    pub fn new(
        voter: impl Into<String>,
        candidate_id: u64,
        transaction_hash: impl Into<String>,
    ) -> Self {
        Self {
            voter: voter.into(),
            candidate_id,
            transaction_hash: transaction_hash.into(),
            timestamp: Utc::now(),
        }
    }

    /// Lowercased voter address, the ledger's comparison key.
    pub fn voter_key(&self) -> String {
        self.voter.to_ascii_lowercase()
    }
}

/// A candidate registered on the ballot contract at deployment time.
///
/// The candidate set is fixed for the lifetime of the deployment; vote
/// counts are always derived from the ledger, never stored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: u64,
    pub name: String,
}

impl Candidate {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A candidate together with its derived vote count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateStanding {
    pub id: u64,
    pub name: String,
    pub vote_count: u64,
}

/// A `VoteCast` event as reported by the remote ledger.
///
/// Arrives both via historical replay at startup and via the live watcher;
/// re-delivery of the same transaction hash must be harmless.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteEvent {
    pub voter: String,
    pub candidate_id: u64,
    pub transaction_hash: String,
}

impl VoteEvent {
    /// Convert into a ledger record, stamped with the observation time.
    pub fn into_record(self) -> VoteRecord {
        VoteRecord::new(self.voter, self.candidate_id, self.transaction_hash)
    }
}

/// Receipt returned by the remote ledger for a submitted vote transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteReceipt {
    /// Address of the account that signed the transaction
    pub voter: String,
    /// Hash of the mined transaction
    pub transaction_hash: String,
}

/// Outcome of a vote submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The vote was accepted by the remote ledger and recorded locally.
    Submitted { transaction_hash: String },
    /// No ledger connection; the vote was acknowledged without touching
    /// any ledger and nothing was recorded.
    Simulated { candidate_id: u64 },
}

impl SubmitOutcome {
    pub fn is_simulated(&self) -> bool {
        matches!(self, SubmitOutcome::Simulated { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voter_key_lowercases() {
        let record = VoteRecord::new("0xABCdef", 1, "0x01");
        assert_eq!(record.voter_key(), "0xabcdef");
        assert_eq!(record.voter, "0xABCdef");
    }

    #[test]
    fn test_event_into_record_preserves_fields() {
        let event = VoteEvent {
            voter: "0xAA".to_string(),
            candidate_id: 2,
            transaction_hash: "0xfeed".to_string(),
        };

        let record = event.clone().into_record();
        assert_eq!(record.voter, event.voter);
        assert_eq!(record.candidate_id, event.candidate_id);
        assert_eq!(record.transaction_hash, event.transaction_hash);
    }

    #[test]
    fn test_record_serialization_roundtrip() {
        let record = VoteRecord::new("0xABC", 1, "0xdeadbeef");
        let json = serde_json::to_string(&record).unwrap();
        let parsed: VoteRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, parsed);
    }

    #[test]
    fn test_submit_outcome_simulated_flag() {
        assert!(SubmitOutcome::Simulated { candidate_id: 0 }.is_simulated());
        assert!(!SubmitOutcome::Submitted {
            transaction_hash: "0x01".to_string()
        }
        .is_simulated());
    }
}
