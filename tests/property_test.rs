//! Property-based tests using proptest.
//!
//! These tests verify the ledger invariants that should hold for any valid
//! input: idempotence by transaction hash, case-insensitive voter identity,
//! and tally conservation.

mod common;

use proptest::prelude::*;

use ballot_relay::infra::SnapshotFile;
use ballot_relay::{VerificationProof, VerifiedIdentityStore, VoteLedger, VoteRecord};

use common::test_candidates;

// ============================================================================
// Custom Strategies
// ============================================================================

/// Generate a transaction hash from a small pool, so duplicates are common
fn arb_tx_hash() -> impl Strategy<Value = String> {
    (0u32..40).prop_map(|n| format!("0xhash{n:04x}"))
}

/// Generate a voter address with arbitrary letter casing
fn arb_voter() -> impl Strategy<Value = String> {
    "0x[0-9a-fA-F]{8}".prop_map(|s| s)
}

fn arb_candidate_id() -> impl Strategy<Value = u64> {
    0u64..6
}

fn arb_votes() -> impl Strategy<Value = Vec<(String, u64, String)>> {
    prop::collection::vec((arb_voter(), arb_candidate_id(), arb_tx_hash()), 0..40)
}

fn rt() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn fresh_ledger(dir: &tempfile::TempDir) -> VoteLedger {
    VoteLedger::open(SnapshotFile::new(dir.path().join("votes.json")))
}

// ============================================================================
// Ledger Properties
// ============================================================================

proptest! {
    /// Property: the ledger holds one record per distinct transaction hash
    #[test]
    fn ledger_len_equals_distinct_hashes(votes in arb_votes()) {
        let dir = tempfile::tempdir().unwrap();
        rt().block_on(async {
            let ledger = fresh_ledger(&dir);
            let mut distinct = std::collections::HashSet::new();

            for (voter, candidate_id, hash) in votes {
                let added = ledger
                    .append(VoteRecord::new(voter, candidate_id, hash.clone()))
                    .await;
                prop_assert_eq!(added, distinct.insert(hash));
            }

            prop_assert_eq!(ledger.len().await, distinct.len());
            Ok(())
        })?;
    }

    /// Property: re-appending the whole sequence changes nothing
    #[test]
    fn reappending_is_a_no_op(votes in arb_votes()) {
        let dir = tempfile::tempdir().unwrap();
        rt().block_on(async {
            let ledger = fresh_ledger(&dir);

            for (voter, candidate_id, hash) in &votes {
                ledger
                    .append(VoteRecord::new(voter.clone(), *candidate_id, hash.clone()))
                    .await;
            }
            let before = ledger.list_all().await;

            for (voter, candidate_id, hash) in &votes {
                let added = ledger
                    .append(VoteRecord::new(voter.clone(), *candidate_id, hash.clone()))
                    .await;
                prop_assert!(!added);
            }

            prop_assert_eq!(ledger.list_all().await, before);
            Ok(())
        })?;
    }

    /// Property: has_voted holds for any casing of a recorded address
    #[test]
    fn has_voted_ignores_case(voter in arb_voter(), flips in prop::collection::vec(any::<bool>(), 10)) {
        let dir = tempfile::tempdir().unwrap();
        rt().block_on(async {
            let ledger = fresh_ledger(&dir);
            ledger
                .append(VoteRecord::new(voter.clone(), 0, "0x01"))
                .await;

            let mangled: String = voter
                .chars()
                .zip(flips.iter().cycle())
                .map(|(c, flip)| {
                    if *flip {
                        c.to_ascii_uppercase()
                    } else {
                        c.to_ascii_lowercase()
                    }
                })
                .collect();

            prop_assert!(ledger.has_voted(&mangled).await);
            Ok(())
        })?;
    }

    /// Property: the tally sums to the record count and covers every
    /// registered candidate
    #[test]
    fn tally_is_conserved_and_zero_filled(votes in arb_votes()) {
        let dir = tempfile::tempdir().unwrap();
        rt().block_on(async {
            let ledger = fresh_ledger(&dir);
            for (voter, candidate_id, hash) in votes {
                ledger
                    .append(VoteRecord::new(voter, candidate_id, hash))
                    .await;
            }

            let candidates = test_candidates();
            let tally = ledger.tally_by_candidate(&candidates).await;

            prop_assert_eq!(
                tally.values().sum::<u64>(),
                ledger.len().await as u64
            );
            for candidate in &candidates {
                prop_assert!(tally.contains_key(&candidate.id));
            }
            Ok(())
        })?;
    }
}

// ============================================================================
// Identity Store Properties
// ============================================================================

proptest! {
    /// Property: the store holds one entry per distinct nullifier hash,
    /// regardless of redemption order or repetition
    #[test]
    fn store_size_equals_distinct_nullifiers(
        nullifiers in prop::collection::vec(0u32..20, 0..40)
    ) {
        let dir = tempfile::tempdir().unwrap();
        rt().block_on(async {
            let store = VerifiedIdentityStore::open(SnapshotFile::new(
                dir.path().join("verified.json"),
            ));
            let mut distinct = std::collections::HashSet::new();

            for n in nullifiers {
                let hash = format!("0xn{n}");
                let outcome = store
                    .redeem(VerificationProof::new("0xaddr", hash.clone()))
                    .await;
                let first_time = distinct.insert(hash);
                prop_assert_eq!(
                    outcome == ballot_relay::RedeemOutcome::Verified,
                    first_time
                );
            }

            prop_assert_eq!(store.len().await, distinct.len());
            Ok(())
        })?;
    }
}
