//! Read-side projections over the vote ledger
//!
//! Everything here is derived from the ledger cache alone; no projection
//! ever calls the remote ledger, so results may lag true chain state by at
//! most the event-poll interval.

mod board;

pub use board::{candidate_board, QueryService};
