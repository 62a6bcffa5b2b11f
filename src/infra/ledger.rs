//! Vote ledger cache
//!
//! The in-memory, durable-on-disk mirror of every vote the relay knows
//! about. `append` is the only mutation: it deduplicates by transaction
//! hash and rewrites the snapshot while holding the write lock, so the
//! submission path and the remote-event echo can interleave in any order
//! without duplicating records.
//!
//! `has_voted` is advisory. Two concurrent submissions for the same address
//! can both pass it before either appends; the remote ledger's own
//! uniqueness rule is the backstop. See the service tests for the pinned
//! behavior.

use std::collections::{BTreeMap, HashSet};

use tokio::sync::RwLock;
use tracing::{debug, error, info};

use crate::domain::{Candidate, VoteEvent, VoteRecord};

use super::SnapshotFile;

#[derive(Default)]
struct LedgerState {
    records: Vec<VoteRecord>,
    transaction_hashes: HashSet<String>,
    voters: HashSet<String>,
}

impl LedgerState {
    fn from_records(records: Vec<VoteRecord>) -> Self {
        let mut state = LedgerState::default();
        for record in records {
            state.transaction_hashes
                .insert(record.transaction_hash.clone());
            state.voters.insert(record.voter_key());
            state.records.push(record);
        }
        state
    }
}

/// Append-only mirror of all votes, persisted as one JSON snapshot.
pub struct VoteLedger {
    snapshot: SnapshotFile<Vec<VoteRecord>>,
    state: RwLock<LedgerState>,
}

impl VoteLedger {
    /// Open the ledger from its snapshot file. A missing or unreadable
    /// snapshot yields an empty ledger.
    pub fn open(snapshot: SnapshotFile<Vec<VoteRecord>>) -> Self {
        let records = snapshot.load_or_default();
        info!(
            "vote ledger loaded: {} record(s) from {}",
            records.len(),
            snapshot.path().display()
        );
        Self {
            snapshot,
            state: RwLock::new(LedgerState::from_records(records)),
        }
    }

    /// Replace the whole ledger with the reconciled remote history.
    pub async fn reconcile(&self, events: Vec<VoteEvent>) {
        let records: Vec<VoteRecord> = events.into_iter().map(VoteEvent::into_record).collect();
        info!("reconciled {} vote(s) from the remote ledger", records.len());

        let mut state = self.state.write().await;
        *state = LedgerState::from_records(records);
        self.persist(&state);
    }

    /// True if any stored record's voter equals `address` case-insensitively.
    pub async fn has_voted(&self, address: &str) -> bool {
        let state = self.state.read().await;
        state.voters.contains(&address.to_ascii_lowercase())
    }

    /// Append a record unless its transaction hash is already present.
    ///
    /// Returns `true` when the record was added. The snapshot is rewritten
    /// under the write lock; a failed write is logged and the in-memory set
    /// stays authoritative for the rest of the process lifetime.
    pub async fn append(&self, record: VoteRecord) -> bool {
        let mut state = self.state.write().await;
        if state.transaction_hashes.contains(&record.transaction_hash) {
            debug!(
                "ignoring duplicate transaction {}",
                record.transaction_hash
            );
            return false;
        }

        state.transaction_hashes
            .insert(record.transaction_hash.clone());
        state.voters.insert(record.voter_key());
        state.records.push(record);
        self.persist(&state);
        true
    }

    /// Ingest a vote event reported by the remote ledger.
    ///
    /// Called for every event the watcher sees, including echoes of votes
    /// this process submitted; re-delivery is a no-op.
    pub async fn observe_event(&self, event: VoteEvent) -> bool {
        self.append(event.into_record()).await
    }

    /// All records in insertion order.
    pub async fn list_all(&self) -> Vec<VoteRecord> {
        self.state.read().await.records.clone()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.records.is_empty()
    }

    /// Vote counts grouped by candidate id.
    ///
    /// Every known candidate id is present, zero-filled; ids seen in the
    /// ledger but absent from the registry are counted as well, so the
    /// totals always sum to the record count.
    pub async fn tally_by_candidate(&self, candidates: &[Candidate]) -> BTreeMap<u64, u64> {
        let state = self.state.read().await;
        let mut tally: BTreeMap<u64, u64> = candidates.iter().map(|c| (c.id, 0)).collect();
        for record in &state.records {
            *tally.entry(record.candidate_id).or_insert(0) += 1;
        }
        tally
    }

    fn persist(&self, state: &LedgerState) {
        if let Err(e) = self.snapshot.write(&state.records) {
            error!(
                "failed to persist vote snapshot {}: {}",
                self.snapshot.path().display(),
                e
            );
        }
    }
}
