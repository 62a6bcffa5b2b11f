//! Core domain types for the ballot relay
//!
//! Votes, candidates, remote vote events, and the verified-identity record
//! kept by the replay guard.

mod identity;
mod vote;

pub use identity::{RedeemOutcome, VerificationProof, VerifiedIdentity};
pub use vote::{Candidate, CandidateStanding, SubmitOutcome, VoteEvent, VoteReceipt, VoteRecord};
