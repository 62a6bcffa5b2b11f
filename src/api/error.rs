//! Structured API error responses
//!
//! Machine-readable error codes plus a human-readable message, so clients
//! can render a specific message for a duplicate vote without parsing prose.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::infra::RelayError;

/// Error codes for API responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Vote named a candidate id outside the registered set
    UnknownCandidate,
    /// Address already has a recorded vote
    DuplicateVote,
    /// Verification bundle lacked a nullifier hash
    MissingNullifier,
    /// The remote ledger rejected or failed the call
    RemoteCallFailed,
    /// Internal server error
    InternalError,
}

impl ErrorCode {
    pub fn http_status(&self) -> StatusCode {
        match self {
            ErrorCode::UnknownCandidate => StatusCode::BAD_REQUEST,
            ErrorCode::DuplicateVote => StatusCode::CONFLICT,
            ErrorCode::MissingNullifier => StatusCode::BAD_REQUEST,
            ErrorCode::RemoteCallFailed => StatusCode::BAD_GATEWAY,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Structured error body for API endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub error: ErrorDetails,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Machine-readable error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetails {
                code,
                message: message.into(),
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        self.error.code.http_status()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

impl From<RelayError> for ApiError {
    fn from(err: RelayError) -> Self {
        let message = err.to_string();
        let code = match err {
            RelayError::UnknownCandidate(_) => ErrorCode::UnknownCandidate,
            RelayError::DuplicateVote(_) => ErrorCode::DuplicateVote,
            RelayError::MissingNullifier => ErrorCode::MissingNullifier,
            RelayError::RemoteUnavailable(_) | RelayError::RemoteCall(_) => {
                ErrorCode::RemoteCallFailed
            }
            RelayError::Io(_)
            | RelayError::Encoding(_)
            | RelayError::Configuration(_)
            | RelayError::Internal(_) => ErrorCode::InternalError,
        };
        ApiError::new(code, message)
    }
}
