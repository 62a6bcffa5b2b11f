//! REST API endpoints for the ballot relay.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::warn;

use crate::domain::{SubmitOutcome, VerificationProof};
use crate::server::AppState;

use super::error::ApiError;

/// Build the `/api` router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/votes", post(submit_vote).get(list_votes))
        .route("/v1/candidates", get(list_candidates))
        .route("/v1/tally", get(get_tally))
        .route("/v1/verifications", post(redeem_verification))
}

// ============================================================================
// Votes
// ============================================================================

#[derive(Debug, Deserialize)]
struct SubmitVoteRequest {
    candidate_id: u64,
    voter_address: String,
}

async fn submit_vote(
    State(state): State<AppState>,
    Json(request): Json<SubmitVoteRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let outcome = state
        .votes
        .submit_vote(request.candidate_id, &request.voter_address)
        .await?;

    match outcome {
        SubmitOutcome::Submitted { transaction_hash } => Ok(Json(serde_json::json!({
            "success": true,
            "transaction_hash": transaction_hash,
        }))),
        SubmitOutcome::Simulated { candidate_id } => Ok(Json(serde_json::json!({
            "success": true,
            "simulated": true,
            "candidate_id": candidate_id,
            "message": "vote simulated (no ledger connection)",
        }))),
    }
}

async fn list_votes(State(state): State<AppState>) -> Json<serde_json::Value> {
    let votes = state.query.history().await;
    Json(serde_json::json!({
        "votes": votes,
        "count": votes.len(),
    }))
}

// ============================================================================
// Candidates and tally
// ============================================================================

async fn list_candidates(State(state): State<AppState>) -> Json<serde_json::Value> {
    if let Some(remote) = state.mode.remote() {
        match remote.fetch_candidates().await {
            Ok(standings) if !standings.is_empty() => {
                return Json(serde_json::json!({
                    "candidates": standings,
                    "live": true,
                }));
            }
            Ok(_) => warn!("ballot contract reports no candidates, serving ledger tally"),
            Err(e) => warn!("live candidate fetch failed, serving ledger tally: {e}"),
        }
    }

    let board = state.query.tally().await;
    Json(serde_json::json!({
        "candidates": board,
        "live": false,
    }))
}

async fn get_tally(State(state): State<AppState>) -> Json<serde_json::Value> {
    let board = state.query.tally().await;
    let total = state.query.total_votes().await;
    Json(serde_json::json!({
        "candidates": board,
        "total_votes": total,
    }))
}

// ============================================================================
// Identity verification
// ============================================================================

#[derive(Debug, Deserialize)]
struct RedeemVerificationRequest {
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    nullifier_hash: Option<String>,
}

async fn redeem_verification(
    State(state): State<AppState>,
    Json(request): Json<RedeemVerificationRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let nullifier_hash = match request.nullifier_hash {
        Some(hash) if !hash.trim().is_empty() => hash,
        _ => return Err(crate::infra::RelayError::MissingNullifier.into()),
    };

    let proof = VerificationProof::new(request.address.unwrap_or_default(), nullifier_hash);
    let outcome = state.identities.redeem(proof).await;

    Ok(Json(serde_json::json!({
        "success": outcome == crate::domain::RedeemOutcome::Verified,
        "status": outcome,
    })))
}
