//! The wallet capability surface consumed by the session manager.

use crate::error::WalletError;
use alloy_primitives::{Address, U256};
use config::ChainDescriptor;
use std::future::Future;
use tokio::sync::mpsc;

/// Provider-level events the dashboard reacts to.
///
/// Both trigger the same resynchronization routine: the session is
/// rebuilt from scratch rather than patched in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletEvent {
    /// The active account set changed
    AccountsChanged(Vec<Address>),
    /// The active chain changed
    ChainChanged(u64),
}

/// Capability surface of a wallet.
///
/// This is the seam between session orchestration and the actual
/// wallet: account discovery, balance and chain reads, chain
/// switch/add, asset tracking, and change events.
pub trait WalletProvider: Send + Sync {
    /// Request the wallet's account list. An empty list means the
    /// request was effectively denied.
    fn request_accounts(&self) -> impl Future<Output = Result<Vec<Address>, WalletError>> + Send;

    /// Native (gas token) balance of an address, in wei.
    fn native_balance(
        &self,
        address: Address,
    ) -> impl Future<Output = Result<U256, WalletError>> + Send;

    /// The wallet's active chain id.
    fn chain_id(&self) -> impl Future<Output = Result<u64, WalletError>> + Send;

    /// Ask the wallet to switch to the given chain.
    ///
    /// Fails with [`WalletError::ChainUnrecognizedByProvider`] if the
    /// wallet does not know the chain.
    fn switch_chain(&self, chain_id: u64) -> impl Future<Output = Result<(), WalletError>> + Send;

    /// Register a chain definition with the wallet. Does not switch.
    fn add_chain(
        &self,
        chain: &ChainDescriptor,
    ) -> impl Future<Output = Result<(), WalletError>> + Send;

    /// Ask the wallet to track an ERC20 token for display.
    fn watch_asset(
        &self,
        token: Address,
        symbol: &str,
        decimals: u8,
    ) -> impl Future<Output = Result<(), WalletError>> + Send;

    /// Subscribe to account/chain change events.
    ///
    /// Dropping the receiver unsubscribes; the session manager ties
    /// the receiver's lifetime to the session so repeated
    /// connect/disconnect cycles never stack up duplicate handlers.
    fn subscribe_events(&self) -> mpsc::UnboundedReceiver<WalletEvent>;
}
