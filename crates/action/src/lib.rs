//! Token write flows: mint, transfer and burn.
//!
//! Each flow is an [`Action`] submitted through [`form::submit`],
//! which owns the notice lifecycle (progress with an explorer link,
//! then success or failure) and the per-form submitting state.

pub mod burn;
pub mod form;
pub mod mint;
pub mod transfer;

use alloy_primitives::TxHash;
use std::{future::Future, pin::Pin};

pub use burn::{BurnAction, BurnConfig};
pub use form::{submit, FormState};
pub use mint::{MintAction, MintConfig};
pub use transfer::{TransferAction, TransferConfig};

/// Receipt summary for a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOutcome {
    /// Transaction hash
    pub tx_hash: TxHash,
    /// Block number where the transaction was included
    pub block_number: Option<u64>,
    /// Gas used
    pub gas_used: u64,
    /// False when the transaction reverted
    pub success: bool,
}

/// A transaction accepted by the network but not yet mined.
///
/// The hash is available immediately (for the progress notice); the
/// receipt resolves later.
pub struct Sent {
    tx_hash: TxHash,
    receipt: Pin<Box<dyn Future<Output = eyre::Result<TxOutcome>> + Send>>,
}

impl Sent {
    pub fn new(
        tx_hash: TxHash,
        receipt: impl Future<Output = eyre::Result<TxOutcome>> + Send + 'static,
    ) -> Self {
        Self {
            tx_hash,
            receipt: Box::pin(receipt),
        }
    }

    pub const fn tx_hash(&self) -> TxHash {
        self.tx_hash
    }

    /// Wait for the transaction to be mined.
    pub async fn confirmed(self) -> eyre::Result<TxOutcome> {
        self.receipt.await
    }
}

/// Trait for token write flows.
pub trait Action: Send + Sync {
    /// Pre-send validation. Failures are surfaced as notices and leave
    /// the form open for correction.
    fn validate(&self) -> eyre::Result<()>;

    /// Submit the contract write call from the connected signer.
    fn send(&self) -> impl Future<Output = eyre::Result<Sent>> + Send;

    /// Get a human-readable description of this action.
    fn description(&self) -> String;
}
