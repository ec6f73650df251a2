//! Token feed: on-chain snapshot plus live transfer watchers.

use crate::model::{TokenState, TransferRecord};
use crate::TokenError;
use alloy_primitives::Address;
use alloy_provider::Provider;
use binding::token::ERC20;
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio_retry::{strategy::ExponentialBackoff, Retry};
use tracing::{debug, warn};

/// A live token read model scoped to one connected address.
///
/// Holds the shared state and the two watcher tasks feeding it.
/// Dropping the feed aborts the watchers, releasing the transfer
/// subscriptions.
pub struct TokenFeed {
    state: Arc<RwLock<TokenState>>,
    watchers: Vec<JoinHandle<()>>,
}

impl TokenFeed {
    /// Shared handle to the underlying state.
    pub fn state(&self) -> Arc<RwLock<TokenState>> {
        Arc::clone(&self.state)
    }

    /// A point-in-time copy of the current state.
    pub async fn snapshot(&self) -> TokenState {
        self.state.read().await.clone()
    }
}

impl Drop for TokenFeed {
    fn drop(&mut self) {
        for watcher in &self.watchers {
            watcher.abort();
        }
    }
}

/// Build the token read model for `signer` against the token contract.
///
/// Strictly sequential: metadata and balance reads, then the full
/// historical transfer log (sender side, then recipient side), then
/// the live watchers starting at the block after the snapshot. The
/// ordering guarantees no event lands in both the snapshot and a
/// watcher. Only once everything is established does the state report
/// `loaded`.
pub async fn bootstrap<P>(
    provider: P,
    token: Address,
    signer: Address,
) -> Result<TokenFeed, TokenError>
where
    P: Provider + Clone + Send + Sync + 'static,
{
    let contract = ERC20::new(token, provider.clone());
    let read_failed = |e: alloy_contract::Error| TokenError::ContractReadFailed(e.to_string());

    let name = contract.name().call().await.map_err(read_failed)?;
    let symbol = contract.symbol().call().await.map_err(read_failed)?;
    let total_supply = contract.totalSupply().call().await.map_err(read_failed)?;
    let balance = contract.balanceOf(signer).call().await.map_err(read_failed)?;

    let snapshot_block = provider
        .get_block_number()
        .await
        .map_err(|e| TokenError::ContractReadFailed(e.to_string()))?;

    debug!(%token, %signer, snapshot_block, "Token snapshot read");

    let signer_topic = signer.into_word();
    let retry = || ExponentialBackoff::from_millis(100).take(5);

    // Historical transfers with the signer as sender.
    let sent = Retry::spawn(retry(), || async {
        contract
            .Transfer_filter()
            .topic1(signer_topic)
            .from_block(0u64)
            .to_block(snapshot_block)
            .query()
            .await
            .map_err(|e| {
                warn!(error = %e, "Sent-transfer log query failed, will retry");
                TokenError::LogQueryFailed(e.to_string())
            })
    })
    .await?;

    // Historical transfers with the signer as recipient.
    let received = Retry::spawn(retry(), || async {
        contract
            .Transfer_filter()
            .topic2(signer_topic)
            .from_block(0u64)
            .to_block(snapshot_block)
            .query()
            .await
            .map_err(|e| {
                warn!(error = %e, "Received-transfer log query failed, will retry");
                TokenError::LogQueryFailed(e.to_string())
            })
    })
    .await?;

    let transfers_from = sent
        .into_iter()
        .map(|(event, log)| TransferRecord {
            tx_hash: log.transaction_hash.unwrap_or_default(),
            block_number: log.block_number.unwrap_or_default(),
            tx_index: log.transaction_index.unwrap_or_default(),
            counterparty: event.to,
            value: event.value,
        })
        .collect();

    let transfers_to = received
        .into_iter()
        .map(|(event, log)| TransferRecord {
            tx_hash: log.transaction_hash.unwrap_or_default(),
            block_number: log.block_number.unwrap_or_default(),
            tx_index: log.transaction_index.unwrap_or_default(),
            counterparty: event.from,
            value: event.value,
        })
        .collect();

    let state = Arc::new(RwLock::new(TokenState {
        name,
        symbol,
        total_supply,
        balance,
        transfers_from,
        transfers_to,
        loaded: false,
    }));

    // Live watchers only start once the snapshot they must not
    // double-count is captured.
    let outgoing = contract
        .Transfer_filter()
        .topic1(signer_topic)
        .from_block(snapshot_block + 1)
        .watch()
        .await
        .map_err(|e| TokenError::SubscriptionFailed(e.to_string()))?;

    let incoming = contract
        .Transfer_filter()
        .topic2(signer_topic)
        .from_block(snapshot_block + 1)
        .watch()
        .await
        .map_err(|e| TokenError::SubscriptionFailed(e.to_string()))?;

    let mut watchers = Vec::with_capacity(2);

    let outgoing_state = Arc::clone(&state);
    watchers.push(tokio::spawn(async move {
        let mut stream = outgoing.into_stream();
        while let Some(item) = stream.next().await {
            match item {
                Ok((event, log)) => {
                    let record = TransferRecord {
                        tx_hash: log.transaction_hash.unwrap_or_default(),
                        block_number: log.block_number.unwrap_or_default(),
                        tx_index: log.transaction_index.unwrap_or_default(),
                        counterparty: event.to,
                        value: event.value,
                    };
                    outgoing_state
                        .write()
                        .await
                        .apply_live_outgoing(record, snapshot_block);
                }
                Err(e) => warn!(error = %e, "Outgoing transfer watcher error"),
            }
        }
    }));

    let incoming_state = Arc::clone(&state);
    watchers.push(tokio::spawn(async move {
        let mut stream = incoming.into_stream();
        while let Some(item) = stream.next().await {
            match item {
                Ok((event, log)) => {
                    let record = TransferRecord {
                        tx_hash: log.transaction_hash.unwrap_or_default(),
                        block_number: log.block_number.unwrap_or_default(),
                        tx_index: log.transaction_index.unwrap_or_default(),
                        counterparty: event.from,
                        value: event.value,
                    };
                    incoming_state
                        .write()
                        .await
                        .apply_live_incoming(record, snapshot_block);
                }
                Err(e) => warn!(error = %e, "Incoming transfer watcher error"),
            }
        }
    }));

    state.write().await.loaded = true;

    Ok(TokenFeed { state, watchers })
}
