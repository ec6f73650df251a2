//! Wallet session management.
//!
//! This crate owns the connected-wallet read model: the connect /
//! disconnect / chain-switch flows, chain validation against the
//! supported-network registry, and native balance refresh. The wallet
//! itself is reached through the [`WalletProvider`] trait, so the
//! session logic is independent of whether the wallet is a headless
//! signer ([`rpc::RpcWallet`]) or something scripted in tests.

pub mod error;
pub mod provider;
pub mod rpc;
pub mod session;

pub use error::WalletError;
pub use provider::{WalletEvent, WalletProvider};
pub use rpc::RpcWallet;
pub use session::{SessionManager, WalletSession};
