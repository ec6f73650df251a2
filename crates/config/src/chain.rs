//! Supported chain registry.
//!
//! The dashboard supports exactly two test networks. Descriptors are
//! static; nothing is created or removed at runtime.

use alloy_primitives::TxHash;

/// Descriptor for a supported chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainDescriptor {
    /// Chain ID
    pub id: u64,
    /// Human-readable network name
    pub name: &'static str,
    /// Native gas token symbol
    pub native_symbol: &'static str,
    /// Block explorer base URL (no trailing slash)
    pub explorer_url: &'static str,
    /// Public RPC base URL
    pub rpc_url: &'static str,
}

impl ChainDescriptor {
    /// Explorer link for a transaction hash.
    pub fn tx_url(&self, hash: TxHash) -> String {
        format!("{}/tx/{}", self.explorer_url, hash)
    }

    /// RPC endpoint with the provider API key appended.
    pub fn rpc_endpoint(&self, api_key: &str) -> String {
        format!("{}/{}", self.rpc_url, api_key)
    }
}

/// Goerli testnet (default chain).
pub const GOERLI: ChainDescriptor = ChainDescriptor {
    id: 5,
    name: "Goerli Testnet",
    native_symbol: "ETH",
    explorer_url: "https://goerli.etherscan.io",
    rpc_url: "https://goerli.infura.io/v3",
};

/// Polygon Mumbai testnet.
pub const MUMBAI: ChainDescriptor = ChainDescriptor {
    id: 80001,
    name: "Polygon Testnet",
    native_symbol: "MATIC",
    explorer_url: "https://mumbai.polygonscan.com",
    rpc_url: "https://endpoints.omniatech.io/v1/matic/mumbai/public",
};

/// All supported chains, in display order.
pub const CHAINS: [&ChainDescriptor; 2] = [&GOERLI, &MUMBAI];

/// Look up a supported chain by id.
pub fn find(id: u64) -> Option<&'static ChainDescriptor> {
    CHAINS.iter().copied().find(|c| c.id == id)
}

/// Whether a chain id is one of the supported networks.
pub fn is_supported(id: u64) -> bool {
    find(id).is_some()
}

/// The chain unsupported-network connections are switched towards.
pub const fn default_chain() -> &'static ChainDescriptor {
    &GOERLI
}
