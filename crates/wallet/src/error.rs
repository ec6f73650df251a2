use thiserror::Error;

/// Failures surfaced by wallet flows.
///
/// Every variant is caught at its call site and converted to a
/// user-visible notice. Only [`WalletError::UnsupportedChain`] and
/// [`WalletError::ChainUnrecognizedByProvider`] trigger an automated
/// recovery (switch / add chain); all others require a user-initiated
/// retry.
#[derive(Error, Debug)]
pub enum WalletError {
    /// No wallet provider is available at all
    #[error("No wallet detected")]
    NoWalletDetected,

    /// The user rejected the account request, or no accounts exist
    #[error("Request wallet accounts failed")]
    AccountRequestDenied,

    /// Native balance read failed
    #[error("Failed to get balance: {0}")]
    BalanceFetchFailed(String),

    /// Active chain id read failed
    #[error("Get network failed: {0}")]
    ChainFetchFailed(String),

    /// The active chain is not one of the supported networks
    #[error("Chain {0} is not supported")]
    UnsupportedChain(u64),

    /// The wallet refused to switch chains
    #[error("Chain switch rejected: {0}")]
    ChainSwitchRejected(String),

    /// The wallet does not know the requested chain (the `4902` case);
    /// recoverable by adding the chain definition
    #[error("Chain {0} not recognized by the wallet")]
    ChainUnrecognizedByProvider(u64),

    /// Any other wallet request failure (add chain, watch asset)
    #[error("Wallet request failed: {0}")]
    Request(String),
}
