//! HTTP API layer for the ballot relay

mod error;
mod rest;

pub use error::{ApiError, ErrorCode};
pub use rest::router;
