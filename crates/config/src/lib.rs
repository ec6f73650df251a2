//! Configuration types for the token dashboard.
//!
//! This crate provides:
//! - The static registry of supported chains
//! - Application configuration (API key, token contract, symbol)

pub mod app;
pub mod chain;

pub use app::AppConfig;
pub use chain::{default_chain, find, is_supported, ChainDescriptor, CHAINS, GOERLI, MUMBAI};
