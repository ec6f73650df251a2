//! ERC20 token read model.
//!
//! Owns the token's metadata, supply and balance snapshot plus the
//! historical and live transfer lists for one connected address. The
//! feed bootstraps strictly sequentially (reads, then historical logs,
//! then live watchers) so that an event captured in the snapshot is
//! never applied a second time.

pub mod feed;
pub mod model;

use thiserror::Error;

pub use feed::{bootstrap, TokenFeed};
pub use model::{TokenState, TransferRecord};

#[derive(Error, Debug)]
pub enum TokenError {
    /// A contract view call (name/symbol/supply/balance) failed
    #[error("Contract read failed: {0}")]
    ContractReadFailed(String),

    /// A historical transfer log query failed after retries
    #[error("Transfer log query failed: {0}")]
    LogQueryFailed(String),

    /// The live watcher could not be established
    #[error("Transfer subscription failed: {0}")]
    SubscriptionFailed(String),
}
