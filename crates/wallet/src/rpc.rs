//! Headless wallet backed by an RPC provider and a fixed account set.
//!
//! The Rust analog of a browser-injected wallet extension: it answers
//! account requests from its configured accounts, reads balances
//! through the injected provider handle, and keeps its own notion of
//! the active chain. Chain switches only succeed for chains the wallet
//! already knows; unknown chains must be added first, mirroring the
//! extension's `4902` behavior.

use crate::error::WalletError;
use crate::provider::{WalletEvent, WalletProvider};
use alloy_primitives::{Address, U256};
use alloy_provider::Provider;
use config::ChainDescriptor;
use std::collections::HashSet;
use std::future::Future;
use std::sync::Mutex;
use tokio::sync::mpsc;
use tracing::debug;

pub struct RpcWallet<P> {
    provider: P,
    accounts: Vec<Address>,
    current_chain: Mutex<u64>,
    known_chains: Mutex<HashSet<u64>>,
    tracked_assets: Mutex<HashSet<Address>>,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<WalletEvent>>>,
}

impl<P> RpcWallet<P>
where
    P: Provider + Clone,
{
    /// Create a wallet over `provider` holding `accounts`, currently on
    /// `chain_id`. All registry chains are known from the start.
    pub fn new(provider: P, accounts: Vec<Address>, chain_id: u64) -> Self {
        let known = config::CHAINS.iter().map(|c| c.id).collect();

        Self {
            provider,
            accounts,
            current_chain: Mutex::new(chain_id),
            known_chains: Mutex::new(known),
            tracked_assets: Mutex::new(HashSet::new()),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Number of live event subscriptions.
    pub fn subscriber_count(&self) -> usize {
        let mut subs = self.subscribers.lock().expect("subscriber lock poisoned");
        subs.retain(|tx| !tx.is_closed());
        subs.len()
    }

    fn emit(&self, event: WalletEvent) {
        let mut subs = self.subscribers.lock().expect("subscriber lock poisoned");
        subs.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

impl<P> WalletProvider for RpcWallet<P>
where
    P: Provider + Clone + Send + Sync,
{
    fn request_accounts(&self) -> impl Future<Output = Result<Vec<Address>, WalletError>> + Send {
        let accounts = self.accounts.clone();
        async move { Ok(accounts) }
    }

    fn native_balance(
        &self,
        address: Address,
    ) -> impl Future<Output = Result<U256, WalletError>> + Send {
        let provider = self.provider.clone();
        async move {
            provider
                .get_balance(address)
                .await
                .map_err(|e| WalletError::BalanceFetchFailed(e.to_string()))
        }
    }

    fn chain_id(&self) -> impl Future<Output = Result<u64, WalletError>> + Send {
        let id = *self.current_chain.lock().expect("chain lock poisoned");
        async move { Ok(id) }
    }

    fn switch_chain(&self, chain_id: u64) -> impl Future<Output = Result<(), WalletError>> + Send {
        let known = self
            .known_chains
            .lock()
            .expect("chain lock poisoned")
            .contains(&chain_id);

        let result = if known {
            *self.current_chain.lock().expect("chain lock poisoned") = chain_id;
            self.emit(WalletEvent::ChainChanged(chain_id));
            debug!(chain_id, "Switched wallet chain");
            Ok(())
        } else {
            Err(WalletError::ChainUnrecognizedByProvider(chain_id))
        };

        async move { result }
    }

    fn add_chain(
        &self,
        chain: &ChainDescriptor,
    ) -> impl Future<Output = Result<(), WalletError>> + Send {
        self.known_chains
            .lock()
            .expect("chain lock poisoned")
            .insert(chain.id);
        debug!(chain_id = chain.id, name = chain.name, "Added chain to wallet");

        async move { Ok(()) }
    }

    fn watch_asset(
        &self,
        token: Address,
        symbol: &str,
        decimals: u8,
    ) -> impl Future<Output = Result<(), WalletError>> + Send {
        self.tracked_assets
            .lock()
            .expect("asset lock poisoned")
            .insert(token);
        debug!(%token, symbol, decimals, "Tracking asset");

        async move { Ok(()) }
    }

    fn subscribe_events(&self) -> mpsc::UnboundedReceiver<WalletEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers
            .lock()
            .expect("subscriber lock poisoned")
            .push(tx);
        rx
    }
}
