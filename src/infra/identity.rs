//! Verified-identity store
//!
//! Replay guard around the external proof system: remembers every redeemed
//! nullifier hash so one identity can redeem a verification at most once.
//! Redeeming an already-seen nullifier is a legitimate outcome, not an
//! error, and appends nothing.

use std::collections::HashSet;

use tokio::sync::RwLock;
use tracing::{error, info};

use crate::domain::{RedeemOutcome, VerificationProof, VerifiedIdentity};

use super::SnapshotFile;

#[derive(Default)]
struct IdentityState {
    entries: Vec<VerifiedIdentity>,
    nullifiers: HashSet<String>,
}

impl IdentityState {
    fn from_entries(entries: Vec<VerifiedIdentity>) -> Self {
        let mut state = IdentityState::default();
        for entry in entries {
            state.nullifiers.insert(entry.nullifier_hash.clone());
            state.entries.push(entry);
        }
        state
    }
}

/// Durable set of redeemed identity verifications, keyed by nullifier hash.
pub struct VerifiedIdentityStore {
    snapshot: SnapshotFile<Vec<VerifiedIdentity>>,
    state: RwLock<IdentityState>,
}

impl VerifiedIdentityStore {
    pub fn open(snapshot: SnapshotFile<Vec<VerifiedIdentity>>) -> Self {
        let entries = snapshot.load_or_default();
        info!(
            "verified-identity store loaded: {} entr(ies) from {}",
            entries.len(),
            snapshot.path().display()
        );
        Self {
            snapshot,
            state: RwLock::new(IdentityState::from_entries(entries)),
        }
    }

    /// Redeem a proof: append it unless its nullifier hash was seen before.
    pub async fn redeem(&self, proof: VerificationProof) -> RedeemOutcome {
        let mut state = self.state.write().await;
        if state.nullifiers.contains(&proof.nullifier_hash) {
            return RedeemOutcome::AlreadyVerified;
        }

        let entry = proof.into_identity();
        state.nullifiers.insert(entry.nullifier_hash.clone());
        state.entries.push(entry);

        if let Err(e) = self.snapshot.write(&state.entries) {
            error!(
                "failed to persist verified-identity snapshot {}: {}",
                self.snapshot.path().display(),
                e
            );
        }
        RedeemOutcome::Verified
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> VerifiedIdentityStore {
        VerifiedIdentityStore::open(SnapshotFile::new(dir.path().join("verified.json")))
    }

    #[tokio::test]
    async fn test_redeem_then_already_verified() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let first = store.redeem(VerificationProof::new("0xA", "0xn1")).await;
        let second = store.redeem(VerificationProof::new("0xB", "0xn1")).await;

        assert_eq!(first, RedeemOutcome::Verified);
        assert_eq!(second, RedeemOutcome::AlreadyVerified);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_distinct_nullifiers_both_verify() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        assert_eq!(
            store.redeem(VerificationProof::new("0xA", "0xn1")).await,
            RedeemOutcome::Verified
        );
        assert_eq!(
            store.redeem(VerificationProof::new("0xA", "0xn2")).await,
            RedeemOutcome::Verified
        );
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_redeemed_nullifiers_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = store_in(&dir);
            store.redeem(VerificationProof::new("0xA", "0xn1")).await;
        }

        let reopened = store_in(&dir);
        assert_eq!(reopened.len().await, 1);
        assert_eq!(
            reopened.redeem(VerificationProof::new("0xC", "0xn1")).await,
            RedeemOutcome::AlreadyVerified
        );
    }
}
