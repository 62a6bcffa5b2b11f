//! On-chain ballot client
//!
//! Wraps the voting contract behind the `RemoteBallot` trait: vote
//! submission, candidate registry reads, and `VoteCast` event replay. A
//! polling watcher feeds new events into a channel whose single consumer is
//! the vote ledger.

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{Address, B256, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use alloy::sol;
use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::domain::{CandidateStanding, VoteEvent, VoteReceipt};
use crate::infra::{RelayError, RemoteBallot, Result};

/// Default node endpoint for local development chains.
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

/// Default interval between `VoteCast` polls.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2_000;

// Generate contract bindings
sol! {
    #[sol(rpc)]
    interface IBallot {
        function vote(uint256 candidateId) external;

        function getNumOfCandidates() external view returns (uint256);

        function candidates(uint256 id) external view returns (string name, uint256 voteCount);

        event VoteCast(address voter, uint256 candidateId);
    }
}

/// Chain client configuration
#[derive(Debug, Clone)]
pub struct ChainConfig {
    /// RPC URL of the chain node
    pub rpc_url: String,
    /// Deployed ballot contract address
    pub ballot_address: Address,
    /// Private key for signing vote transactions
    pub private_key: String,
    /// Interval between `VoteCast` polls, in milliseconds
    pub poll_interval_ms: u64,
}

impl ChainConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` when the ballot address or signing key is absent, in
    /// which case the relay runs in simulation mode.
    pub fn from_env() -> Option<Self> {
        let rpc_url =
            std::env::var("BALLOT_RPC_URL").unwrap_or_else(|_| DEFAULT_RPC_URL.to_string());
        let ballot_address = std::env::var("BALLOT_ADDRESS")
            .ok()
            .and_then(|s| s.parse().ok())?;
        let private_key = std::env::var("RELAY_PRIVATE_KEY").ok()?;
        let poll_interval_ms = std::env::var("VOTE_POLL_INTERVAL_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_POLL_INTERVAL_MS);

        Some(Self {
            rpc_url,
            ballot_address,
            private_key,
            poll_interval_ms,
        })
    }
}

/// Client for the deployed ballot contract.
pub struct ChainBallot {
    config: ChainConfig,
}

impl ChainBallot {
    /// Probe the node and construct the client.
    ///
    /// Failure here means the remote ledger is unreachable; the caller
    /// falls back to simulation mode rather than refusing to start.
    pub async fn connect(config: ChainConfig) -> Result<Self> {
        let provider = ProviderBuilder::new().on_http(parse_url(&config.rpc_url)?);

        let chain_id = provider
            .get_chain_id()
            .await
            .map_err(|e| RelayError::RemoteUnavailable(e.to_string()))?;

        info!(
            "connected to chain {} at {} (ballot {})",
            chain_id, config.rpc_url, config.ballot_address
        );

        Ok(Self { config })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.config.poll_interval_ms)
    }

    /// Spawn the `VoteCast` watcher, polling from `from_block` onward and
    /// forwarding every event into `events`. Stops when the receiving side
    /// is dropped.
    pub fn spawn_vote_watcher(
        self: Arc<Self>,
        mut from_block: u64,
        events: mpsc::Sender<VoteEvent>,
    ) -> tokio::task::JoinHandle<()> {
        let client = self;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(client.poll_interval());
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                match client.fetch_votes(from_block).await {
                    Ok((new_events, next_block)) => {
                        for event in new_events {
                            if events.send(event).await.is_err() {
                                debug!("vote event channel closed, stopping watcher");
                                return;
                            }
                        }
                        from_block = next_block;
                    }
                    Err(e) => warn!("vote event poll failed: {e}"),
                }
            }
        })
    }
}

#[async_trait]
impl RemoteBallot for ChainBallot {
    async fn submit_vote(&self, candidate_id: u64) -> Result<VoteReceipt> {
        let signer: PrivateKeySigner = self
            .config
            .private_key
            .parse()
            .map_err(|e| RelayError::Configuration(format!("invalid relay private key: {e}")))?;
        let voter = signer.address();

        let provider = ProviderBuilder::new()
            .with_recommended_fillers()
            .wallet(alloy::network::EthereumWallet::from(signer))
            .on_http(parse_url(&self.config.rpc_url)?);

        let contract = IBallot::new(self.config.ballot_address, &provider);

        let pending = contract
            .vote(U256::from(candidate_id))
            .send()
            .await
            .map_err(|e| RelayError::RemoteCall(e.to_string()))?;

        debug!("vote transaction sent: {:?}", pending.tx_hash());

        let receipt = pending
            .get_receipt()
            .await
            .map_err(|e| RelayError::RemoteCall(e.to_string()))?;

        Ok(VoteReceipt {
            voter: voter.to_string(),
            transaction_hash: format!("0x{}", hex::encode(receipt.transaction_hash)),
        })
    }

    async fn fetch_candidates(&self) -> Result<Vec<CandidateStanding>> {
        let provider = ProviderBuilder::new().on_http(parse_url(&self.config.rpc_url)?);
        let contract = IBallot::new(self.config.ballot_address, &provider);

        let count = contract
            .getNumOfCandidates()
            .call()
            .await
            .map_err(|e| RelayError::RemoteCall(e.to_string()))?
            ._0
            .to::<u64>();

        let mut standings = Vec::with_capacity(count as usize);
        for id in 0..count {
            let candidate = contract
                .candidates(U256::from(id))
                .call()
                .await
                .map_err(|e| RelayError::RemoteCall(e.to_string()))?;

            standings.push(CandidateStanding {
                id,
                name: candidate.name,
                vote_count: candidate.voteCount.to::<u64>(),
            });
        }

        Ok(standings)
    }

    async fn fetch_votes(&self, from_block: u64) -> Result<(Vec<VoteEvent>, u64)> {
        let provider = ProviderBuilder::new().on_http(parse_url(&self.config.rpc_url)?);

        let latest = provider
            .get_block_number()
            .await
            .map_err(|e| RelayError::RemoteCall(e.to_string()))?;

        if latest < from_block {
            return Ok((Vec::new(), from_block));
        }

        let contract = IBallot::new(self.config.ballot_address, &provider);
        let logs = contract
            .VoteCast_filter()
            .from_block(from_block)
            .to_block(latest)
            .query()
            .await
            .map_err(|e| RelayError::RemoteCall(e.to_string()))?;

        let events = logs
            .into_iter()
            .filter_map(|(event, log)| {
                // unmined logs carry no transaction hash and are re-polled
                log.transaction_hash.map(|hash| decode_vote(event, hash))
            })
            .collect();

        Ok((events, latest + 1))
    }
}

fn parse_url(rpc_url: &str) -> Result<alloy::transports::http::reqwest::Url> {
    rpc_url
        .parse()
        .map_err(|e| RelayError::Configuration(format!("invalid rpc url {rpc_url:?}: {e}")))
}

/// Convert a decoded `VoteCast` log into the domain event.
fn decode_vote(event: IBallot::VoteCast, transaction_hash: B256) -> VoteEvent {
    VoteEvent {
        voter: event.voter.to_string(),
        candidate_id: event.candidateId.to::<u64>(),
        transaction_hash: format!("0x{}", hex::encode(transaction_hash)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_vote_formats_fields() {
        let event = IBallot::VoteCast {
            voter: Address::repeat_byte(0xab),
            candidateId: U256::from(2u64),
        };
        let hash = B256::repeat_byte(0x11);

        let vote = decode_vote(event, hash);

        assert_eq!(vote.candidate_id, 2);
        assert!(vote.voter.starts_with("0x"));
        assert_eq!(vote.voter.len(), 42);
        assert!(vote.transaction_hash.starts_with("0x"));
        assert_eq!(vote.transaction_hash.len(), 66);
    }

    #[test]
    fn test_parse_url_rejects_garbage() {
        assert!(parse_url("not a url").is_err());
        assert!(parse_url(DEFAULT_RPC_URL).is_ok());
    }
}
