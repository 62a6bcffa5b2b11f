//! HTTP server bootstrap for the ballot relay.
//!
//! This module wires together:
//! - configuration
//! - the durable vote ledger and verified-identity stores
//! - the chain connection (or simulation fallback)
//! - the vote event pump
//! - the Axum router

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use tokio::sync::mpsc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;

use crate::chain::{ChainBallot, ChainConfig};
use crate::domain::Candidate;
use crate::infra::{
    BallotMode, RemoteBallot, SnapshotFile, VerifiedIdentityStore, VoteLedger, VoteService,
};
use crate::projection::QueryService;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server listen address.
    pub listen_addr: SocketAddr,
    /// Directory holding the vote and verified-identity snapshots.
    pub data_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let listen_addr: SocketAddr = format!("{host}:{port}")
            .parse()
            .expect("Invalid listen address");

        let data_dir = std::env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));

        Self {
            listen_addr,
            data_dir,
        }
    }
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub votes: Arc<VoteService>,
    pub query: Arc<QueryService>,
    pub identities: Arc<VerifiedIdentityStore>,
    pub ledger: Arc<VoteLedger>,
    pub mode: BallotMode,
}

/// Candidate set served when the on-chain registry cannot be read.
pub fn sample_candidates() -> Vec<Candidate> {
    vec![
        Candidate::new(0, "Alice"),
        Candidate::new(1, "Bob"),
        Candidate::new(2, "Charlie"),
    ]
}

/// Start the HTTP server.
pub async fn run() -> anyhow::Result<()> {
    init_tracing();

    info!("Starting Ballot Relay v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env();
    info!("Configuration loaded");
    info!("  Listen address: {}", config.listen_addr);
    info!("  Data directory: {}", config.data_dir.display());

    std::fs::create_dir_all(&config.data_dir)?;

    let ledger = Arc::new(VoteLedger::open(SnapshotFile::new(
        config.data_dir.join("votes.json"),
    )));
    let identities = Arc::new(VerifiedIdentityStore::open(SnapshotFile::new(
        config.data_dir.join("verified-voters.json"),
    )));

    let (mode, candidates) = connect_ballot(&ledger).await;
    match &mode {
        BallotMode::Connected(_) => info!("ballot contract connected, votes go on chain"),
        BallotMode::Simulated => info!("running in simulation mode, votes are not recorded"),
    }

    let state = AppState {
        votes: Arc::new(VoteService::new(
            mode.clone(),
            ledger.clone(),
            candidates.clone(),
        )),
        query: Arc::new(QueryService::new(ledger.clone(), candidates)),
        identities,
        ledger,
        mode,
    };

    let app = build_router()?.with_state(state);

    info!("Starting HTTP server on {}", config.listen_addr);
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;

    info!("Ballot relay is ready to accept connections");
    axum::serve(listener, app).await?;

    Ok(())
}

/// Probe the chain, replay vote history, and wire the event pump.
///
/// Any failure along the way degrades to simulation mode; connectivity is
/// decided once here and never retried during the process lifetime.
async fn connect_ballot(ledger: &Arc<VoteLedger>) -> (BallotMode, Vec<Candidate>) {
    let Some(chain_config) = ChainConfig::from_env() else {
        info!(
            "ballot contract not configured (set BALLOT_ADDRESS and RELAY_PRIVATE_KEY to enable)"
        );
        return (BallotMode::Simulated, sample_candidates());
    };

    let client = match ChainBallot::connect(chain_config).await {
        Ok(client) => Arc::new(client),
        Err(e) => {
            warn!("remote ledger unreachable: {e}");
            return (BallotMode::Simulated, sample_candidates());
        }
    };

    // Rebuild the ledger wholesale from the full on-chain vote history.
    let next_block = match client.fetch_votes(0).await {
        Ok((events, next_block)) => {
            ledger.reconcile(events).await;
            next_block
        }
        Err(e) => {
            warn!("vote history replay failed: {e}");
            return (BallotMode::Simulated, sample_candidates());
        }
    };

    let candidates = match client.fetch_candidates().await {
        Ok(standings) if !standings.is_empty() => standings
            .into_iter()
            .map(|s| Candidate::new(s.id, s.name))
            .collect(),
        Ok(_) => {
            warn!("ballot contract reports no candidates, using the sample set");
            sample_candidates()
        }
        Err(e) => {
            warn!("candidate registry fetch failed, using the sample set: {e}");
            sample_candidates()
        }
    };

    // Live echo of new votes; the ledger is the channel's single consumer.
    let (events_tx, mut events_rx) = mpsc::channel(64);
    client.clone().spawn_vote_watcher(next_block, events_tx);

    let event_ledger = ledger.clone();
    tokio::spawn(async move {
        while let Some(event) = events_rx.recv().await {
            event_ledger.observe_event(event).await;
        }
    });

    let remote: Arc<dyn RemoteBallot> = client;
    (BallotMode::Connected(remote), candidates)
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .init();
}

fn build_router() -> anyhow::Result<Router<AppState>> {
    let mut router = Router::new()
        .nest("/api", crate::api::router())
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .layer(TraceLayer::new_for_http());

    if let Some(cors_layer) = cors_layer_from_env()? {
        router = router.layer(cors_layer);
    }

    Ok(router)
}

fn cors_layer_from_env() -> anyhow::Result<Option<CorsLayer>> {
    let origins = match std::env::var("CORS_ALLOW_ORIGINS") {
        Ok(v) => v,
        Err(_) => return Ok(None),
    };

    let origins = origins.trim();
    if origins.is_empty() {
        return Ok(None);
    }

    let allow_origin = if origins == "*" {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = origins
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin {s:?}: {e}"))
            })
            .collect::<anyhow::Result<_>>()?;
        AllowOrigin::list(origins)
    };

    Ok(Some(
        CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([axum::http::header::CONTENT_TYPE]),
    ))
}

/// Health check endpoint.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "healthy",
        "service": "ballot-relay",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Readiness check endpoint.
async fn readiness_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> axum::Json<serde_json::Value> {
    let mode = match &state.mode {
        BallotMode::Connected(_) => "connected",
        BallotMode::Simulated => "simulated",
    };

    axum::Json(serde_json::json!({
        "status": "ready",
        "mode": mode,
        "recorded_votes": state.ledger.len().await,
    }))
}
