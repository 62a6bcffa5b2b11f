//! Infrastructure layer for the ballot relay
//!
//! Contains:
//! - the vote ledger cache (append-only, idempotent by transaction hash)
//! - the verified-identity replay guard
//! - vote submission orchestration and the connectivity mode
//! - snapshot persistence (atomic full-document rewrites)
//! - the remote ballot trait boundary

mod error;
mod identity;
mod ledger;
mod snapshot;
mod traits;
mod voting;

pub use error::*;
pub use identity::VerifiedIdentityStore;
pub use ledger::VoteLedger;
pub use snapshot::SnapshotFile;
pub use traits::*;
pub use voting::{BallotMode, VoteService};
