//! Candidate board and vote-history projections

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::{Candidate, CandidateStanding, VoteRecord};
use crate::infra::VoteLedger;

/// Compose the fixed candidate registry with a ledger tally.
///
/// Every registered candidate appears exactly once, zero-filled when it has
/// no votes.
pub fn candidate_board(
    candidates: &[Candidate],
    tally: &BTreeMap<u64, u64>,
) -> Vec<CandidateStanding> {
    candidates
        .iter()
        .map(|candidate| CandidateStanding {
            id: candidate.id,
            name: candidate.name.clone(),
            vote_count: tally.get(&candidate.id).copied().unwrap_or(0),
        })
        .collect()
}

/// Answers vote-history and tally queries from the ledger cache.
pub struct QueryService {
    ledger: Arc<VoteLedger>,
    candidates: Vec<Candidate>,
}

impl QueryService {
    pub fn new(ledger: Arc<VoteLedger>, candidates: Vec<Candidate>) -> Self {
        Self { ledger, candidates }
    }

    /// All recorded votes in insertion order.
    pub async fn history(&self) -> Vec<VoteRecord> {
        self.ledger.list_all().await
    }

    /// Per-candidate standings derived purely from the ledger.
    pub async fn tally(&self) -> Vec<CandidateStanding> {
        let tally = self.ledger.tally_by_candidate(&self.candidates).await;
        candidate_board(&self.candidates, &tally)
    }

    pub async fn total_votes(&self) -> usize {
        self.ledger.len().await
    }
}

#[cfg(test)]
mod tests {
    use crate::infra::SnapshotFile;

    use super::*;

    fn candidates() -> Vec<Candidate> {
        vec![
            Candidate::new(0, "Alice"),
            Candidate::new(1, "Bob"),
            Candidate::new(2, "Charlie"),
        ]
    }

    #[test]
    fn test_board_zero_fills_and_orders() {
        let tally = BTreeMap::from([(0, 0), (1, 2), (2, 0)]);
        let board = candidate_board(&candidates(), &tally);

        assert_eq!(board.len(), 3);
        assert_eq!(board[0].vote_count, 0);
        assert_eq!(board[1].vote_count, 2);
        assert_eq!(board[2].vote_count, 0);
        assert_eq!(board[1].name, "Bob");
    }

    #[tokio::test]
    async fn test_query_tally_tracks_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = Arc::new(VoteLedger::open(SnapshotFile::new(
            dir.path().join("votes.json"),
        )));
        let query = QueryService::new(ledger.clone(), candidates());

        assert!(query.tally().await.iter().all(|s| s.vote_count == 0));

        ledger
            .append(crate::domain::VoteRecord::new("0xA", 1, "0x01"))
            .await;

        let board = query.tally().await;
        assert_eq!(board[1].vote_count, 1);
        assert_eq!(query.total_votes().await, 1);
        assert_eq!(query.history().await.len(), 1);
    }
}
