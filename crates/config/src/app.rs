use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level dashboard configuration.
///
/// Read once at startup and never re-read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// RPC provider API key (appended to the chain's RPC base URL)
    pub rpc_api_key: String,

    /// ERC20 token contract address
    pub token_address: Address,

    /// ERC20 display symbol
    pub token_symbol: String,
}

impl AppConfig {
    pub fn from_file(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;

        Ok(config)
    }

    /// Load from environment variables: `RPC_API_KEY`, `TOKEN_ADDRESS`,
    /// `TOKEN_SYMBOL`.
    pub fn from_env() -> eyre::Result<Self> {
        let rpc_api_key = std::env::var("RPC_API_KEY")?;
        let token_address = std::env::var("TOKEN_ADDRESS")?.parse()?;
        let token_symbol = std::env::var("TOKEN_SYMBOL")?;

        Ok(Self {
            rpc_api_key,
            token_address,
            token_symbol,
        })
    }

    /// Load from a file if it exists, otherwise from the environment.
    pub fn load(path: impl AsRef<Path>) -> eyre::Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            Self::from_env()
        }
    }
}
