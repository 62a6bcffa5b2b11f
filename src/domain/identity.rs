//! Verified-identity records for the proof replay guard
//!
//! The relay does not verify proofs itself; it only remembers which
//! nullifier hashes have already redeemed a verification so the same
//! identity cannot redeem twice.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A redeemed identity verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedIdentity {
    /// Wallet address claimed at verification time. Informational only;
    /// uniqueness is keyed on the nullifier hash.
    pub address: String,

    /// One-way value proving a single real-world identity redeemed a proof
    /// exactly once. Pairwise distinct across all entries.
    pub nullifier_hash: String,

    /// When the verification was recorded
    pub timestamp: DateTime<Utc>,
}

/// A verification proof bundle as presented by a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationProof {
    pub address: String,
    pub nullifier_hash: String,
}

impl VerificationProof {
    pub fn new(address: impl Into<String>, nullifier_hash: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            nullifier_hash: nullifier_hash.into(),
        }
    }

    /// Record this proof as redeemed now.
    pub fn into_identity(self) -> VerifiedIdentity {
        VerifiedIdentity {
            address: self.address,
            nullifier_hash: self.nullifier_hash,
            timestamp: Utc::now(),
        }
    }
}

/// Outcome of redeeming a verification proof.
///
/// `AlreadyVerified` is a legitimate state, not an error: the identity
/// redeemed a proof in the past and nothing is re-appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedeemOutcome {
    Verified,
    AlreadyVerified,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proof_into_identity_keeps_nullifier() {
        let proof = VerificationProof::new("0xABC", "0xn1");
        let identity = proof.into_identity();
        assert_eq!(identity.address, "0xABC");
        assert_eq!(identity.nullifier_hash, "0xn1");
    }

    #[test]
    fn test_redeem_outcome_serialization() {
        assert_eq!(
            serde_json::to_string(&RedeemOutcome::Verified).unwrap(),
            "\"verified\""
        );
        assert_eq!(
            serde_json::to_string(&RedeemOutcome::AlreadyVerified).unwrap(),
            "\"already_verified\""
        );
    }
}
